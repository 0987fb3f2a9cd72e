pub mod dispatcher;
pub mod resolver;

pub use crate::domain::model::{OperationRequest, ResolvedCall, ResultRecord};
pub use crate::domain::ports::{CredentialProvider, HttpTransport};
pub use crate::utils::error::Result;
