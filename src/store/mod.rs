pub mod single_slot;
