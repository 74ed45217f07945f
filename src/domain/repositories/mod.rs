pub mod chain_repository;

pub use chain_repository::ChainRepository;
