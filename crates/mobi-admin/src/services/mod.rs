//! Permission-guarded back-office services.
//!
//! Every call checks the acting user's role before touching the backend.

mod category;
mod order;
mod product;
mod user;

pub use category::CategoryService;
pub use order::OrderService;
pub use product::ProductService;
pub use user::UserService;
