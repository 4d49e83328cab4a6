pub mod common;

pub mod a001_employee;
pub mod a002_role_template;
pub mod a003_order_tracking;
pub mod a004_sale;
pub mod a005_invoice;
pub mod a006_sale_return;
pub mod a007_business_profile;
