pub mod bind;
pub mod check;
pub mod init;
pub mod resolve;

pub use bind::{bind, BindArgs};
pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use resolve::{resolve, ResolveArgs};
