pub mod payment_methods;
pub mod week_days;
