/// Ordinal of `label` among an enumerated control's items.
///
/// Exact, case-sensitive match; the first matching item wins.
pub fn label_to_ordinal<S: AsRef<str>>(items: &[S], label: &str) -> Option<usize> {
    items.iter().position(|item| item.as_ref() == label)
}
