//! Generation providers and the fallback chain that orders them.

pub mod chain;
pub mod local;
pub(crate) mod prompt;
pub mod remote;
pub mod retry;
pub mod template;
pub mod traits;

pub use chain::{ChainSuccess, ProviderChain, ProviderSettings};
pub use local::LocalModelProvider;
pub use remote::RemoteProvider;
pub use retry::RetryConfig;
pub use template::TemplateProvider;
pub use traits::{ArticleProvider, ProviderArticle};
