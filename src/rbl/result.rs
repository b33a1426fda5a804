/// Crate-wide result; typed errors are raised with `Err(..)?` and recovered with `downcast_ref`
pub type Result<T = ()> = anyhow::Result<T>;
