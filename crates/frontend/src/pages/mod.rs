pub mod pin_drop;
