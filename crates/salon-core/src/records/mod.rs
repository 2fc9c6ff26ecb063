//! Typed salon records.
//!
//! One module per collection: services, stylists, products, blog posts.
//! Each record implements [`Resource`](crate::documents::Resource) for the
//! generic admin table and exposes its validation schema plus draft
//! builders for the write path.

mod blog;
mod product;
mod service;
mod stylist;

pub use blog::BlogPost;
pub use product::Product;
pub use service::{Review, Service, ServiceCategory};
pub use stylist::Stylist;
