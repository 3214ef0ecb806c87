pub mod aggregate;
pub mod id;
pub mod jwt;
pub mod lookup;
pub mod ownership;
pub mod pagination;
pub mod toggle;
pub mod upload;
pub mod users;
