pub mod capability_prober;
