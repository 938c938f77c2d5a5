//! Domain models shared by repositories, services and handlers.

pub mod cart;
pub mod notification;
pub mod order;
pub mod product;
pub mod profile;

pub use cart::CartKey;
pub use notification::{
    AdminNotification, DEFAULT_NOTIFICATION_LIMIT, MAX_NOTIFICATION_LIMIT, NewNotification,
};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, TrackedOrder};
pub use product::{LOW_STOCK_THRESHOLD, NewProduct, Product, StockSummary};
pub use profile::{Profile, ProfileUpdate, UserView};
