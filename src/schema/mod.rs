mod user;

pub use user::{InsertUser, ListParams, SortDirection, SortField, UpdateUser, User};
