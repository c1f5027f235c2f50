//! Infrastructure layer: concrete storage behind the domain's
//! [`UrlStore`](crate::domain::repositories::UrlStore) contract.

pub mod persistence;
