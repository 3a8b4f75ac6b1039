//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! Every read-check-write sequence runs inside a single database
//! transaction with row locks on the entities being checked.

pub mod item;
pub mod payment;
pub mod product;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod user;

pub use item::{ItemError, ItemRepository, UpdateItemInput};
pub use payment::{PaymentError, PaymentKind, PaymentRepository, RecordPaymentInput, RecordedPayment};
pub use product::{
    CreateProductInput, IngredientInput, ProductError, ProductRepository, ProductWithRecipe,
    RecipeLine,
};
pub use purchase::{
    CreatePurchaseInput, DateRange, PurchaseError, PurchaseRepository, UpdatePurchaseInput,
};
pub use report::{ReportError, ReportRepository};
pub use sale::{
    CreateSaleInput, ProcessReturnInput, SaleError, SaleRepository, UpdateSaleInput,
};
pub use user::{RegisterUserInput, UserError, UserRepository};
