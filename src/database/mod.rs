pub mod db;

pub use db::StorageError;
