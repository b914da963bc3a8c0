//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, auth_handler, cart_handler, category_handler, order_handler, product_handler,
    user_handler,
};
use crate::domain::{
    CartLineResponse, CartView, CategoryResponse, OrderDetail, OrderItemDetail, OrderStatus,
    OrderSummary, PaymentStatus, PlacedOrder, ProductResponse, ProductSort, ProductStatus,
    SortOrder, UserResponse, UserRole,
};
use crate::services::TokenResponse;
use crate::types::{MessageResponse, PaginationMeta};

/// OpenAPI documentation for the TechWave Commerce API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TechWave Commerce API",
        version = "0.1.0",
        description = "E-commerce backend: catalog, cart, and transactional order placement",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "API Support", email = "support@example.com")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
        (url = "https://api.example.com", description = "Production server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Profile endpoints
        user_handler::get_profile,
        user_handler::update_profile,
        user_handler::change_password,
        // Catalog endpoints
        product_handler::list_products,
        product_handler::featured_products,
        product_handler::get_product,
        category_handler::list_categories,
        category_handler::get_category,
        // Cart endpoints
        cart_handler::view_cart,
        cart_handler::add_to_cart,
        cart_handler::update_cart_item,
        cart_handler::remove_cart_item,
        cart_handler::clear_cart,
        // Order endpoints
        order_handler::place_order,
        order_handler::my_orders,
        order_handler::get_order,
        // Admin endpoints
        admin_handler::list_orders,
        admin_handler::get_order,
        admin_handler::update_order_status,
        admin_handler::create_product,
        admin_handler::update_product,
        admin_handler::delete_product,
        admin_handler::create_category,
        admin_handler::update_category,
        admin_handler::delete_category,
        admin_handler::list_users,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            CategoryResponse,
            ProductStatus,
            ProductSort,
            SortOrder,
            ProductResponse,
            CartLineResponse,
            CartView,
            OrderStatus,
            PaymentStatus,
            OrderSummary,
            OrderItemDetail,
            OrderDetail,
            PlacedOrder,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            // Profile types
            user_handler::UpdateProfileRequest,
            user_handler::ChangePasswordRequest,
            // Cart types
            cart_handler::AddToCartRequest,
            cart_handler::UpdateCartItemRequest,
            // Order types
            order_handler::PlaceOrderRequest,
            // Admin types
            admin_handler::CreateProductRequest,
            admin_handler::UpdateProductRequest,
            admin_handler::CreateCategoryRequest,
            admin_handler::UpdateCategoryRequest,
            admin_handler::UpdateOrderStatusRequest,
            // Shared types
            MessageResponse,
            PaginationMeta,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "Profile management"),
        (name = "Products", description = "Public product catalog"),
        (name = "Categories", description = "Public category listing"),
        (name = "Cart", description = "Shopping cart operations"),
        (name = "Orders", description = "Order placement and history"),
        (name = "Admin", description = "Back-office management")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
