pub mod authorize;
pub mod policy;

pub use authorize::{authorize, AuthorizedUseCase};
pub use policy::{PolicySnapshot, PolicyStore, UseCase};
