//! Widget-family rules, one module per page-builder family.

pub mod elementor_basic;
pub mod elementor_pro;
pub mod woocommerce;
pub mod wordpress;

pub use elementor_basic::ELEMENTOR_BASIC_RULES;
pub use elementor_pro::ELEMENTOR_PRO_RULES;
pub use woocommerce::WOOCOMMERCE_RULES;
pub use wordpress::WORDPRESS_CORE_RULES;
