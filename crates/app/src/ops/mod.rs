pub mod download;
pub mod init;
pub mod ls;
pub mod mkdir;
pub mod mv;
pub mod rename;
pub mod replace;
pub mod rm;
pub mod upload;

pub use download::Download;
pub use init::Init;
pub use ls::Ls;
pub use mkdir::Mkdir;
pub use mv::Mv;
pub use rename::Rename;
pub use replace::Replace;
pub use rm::Rm;
pub use upload::Upload;
