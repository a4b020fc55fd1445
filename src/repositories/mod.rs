mod link;

pub use link::{LinkRepository, LinkRepositoryTrait};

#[cfg(test)]
pub use link::MockLinkRepositoryTrait;
