pub mod cart;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Schema, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::info;

use crate::entities::{
    cart::Entity as Cart,
    order::Entity as Order,
    order_item::Entity as OrderItem,
    product::Entity as Product,
    user::Entity as User,
};

pub async fn setup_schema(db: &DatabaseConnection) {
    let schema = Schema::new(db.get_database_backend());

    let mut create_user_table = schema.create_table_from_entity(User);
    let mut create_product_table = schema.create_table_from_entity(Product);
    let mut create_cart_table = schema.create_table_from_entity(Cart);
    let mut create_order_table = schema.create_table_from_entity(Order);
    let mut create_order_item_table = schema.create_table_from_entity(OrderItem);

    db.execute(db.get_database_backend().build(create_user_table.if_not_exists()))
        .await
        .expect("Failed to create users schema");
    db.execute(db.get_database_backend().build(create_product_table.if_not_exists()))
        .await
        .expect("Failed to create products schema");
    db.execute(db.get_database_backend().build(create_cart_table.if_not_exists()))
        .await
        .expect("Failed to create cart schema");
    db.execute(db.get_database_backend().build(create_order_table.if_not_exists()))
        .await
        .expect("Failed to create orders schema");
    db.execute(db.get_database_backend().build(create_order_item_table.if_not_exists()))
        .await
        .expect("Failed to create order_items schema");
}

/// Seeds the admin account and the storefront catalog on first start.
pub async fn seed_database(db: Arc<DatabaseConnection>) {
    seed_admin(&db).await;
    seed_catalog(&db).await;
}

async fn seed_admin(db: &DatabaseConnection) {
    let existing = User::find()
        .count(db)
        .await
        .expect("Failed to count users during seeding");
    if existing > 0 {
        return;
    }

    let password =
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "change_this_password".to_owned());

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .expect("Failed to hash admin password")
        .to_string();

    let new_admin = user::ActiveModel {
        email: Set("admin@printforge.dev".to_owned()),
        password: Set(password_hash),
        name: Set("Administrator".to_owned()),
        role: Set(user::Role::Admin),
        ..Default::default()
    };

    User::insert(new_admin)
        .exec(db)
        .await
        .expect("Failed to seed admin account");
    info!("Seeded admin account");
}

async fn seed_catalog(db: &DatabaseConnection) {
    let existing = Product::find()
        .count(db)
        .await
        .expect("Failed to count products during seeding");
    if existing > 0 {
        return;
    }

    let catalog = [
        product::ActiveModel {
            name: Set("Geometric Vase".to_owned()),
            description: Set(
                "Modern geometric vase with intricate faceted design. Perfect for home décor and as a statement piece."
                    .to_owned(),
            ),
            price: Set(49.99),
            category: Set("Decorative".to_owned()),
            image: Set("product-vase.jpg".to_owned()),
            materials: Set(vec!["PLA", "PETG"].into()),
            colors: Set(vec!["White", "Black", "Gray", "Gold"].into()),
            print_time: Set("8-12 hours".to_owned()),
            rating: Set(4.8),
            reviews: Set(124),
            in_stock: Set(true),
            featured: Set(true),
            ..Default::default()
        },
        product::ActiveModel {
            name: Set("Precision Gear Set".to_owned()),
            description: Set(
                "High-precision mechanical gear set for robotics and engineering projects. Tight tolerances guaranteed."
                    .to_owned(),
            ),
            price: Set(34.99),
            category: Set("Mechanical".to_owned()),
            image: Set("product-gears.jpg".to_owned()),
            materials: Set(vec!["PETG", "Nylon", "ABS"].into()),
            colors: Set(vec!["Silver", "Black"].into()),
            print_time: Set("6-8 hours".to_owned()),
            rating: Set(4.9),
            reviews: Set(89),
            in_stock: Set(true),
            featured: Set(true),
            ..Default::default()
        },
        product::ActiveModel {
            name: Set("Fantasy Warrior Miniature".to_owned()),
            description: Set(
                "Highly detailed fantasy warrior miniature for tabletop gaming. Exceptional detail at 28mm scale."
                    .to_owned(),
            ),
            price: Set(24.99),
            category: Set("Miniatures".to_owned()),
            image: Set("product-miniature.jpg".to_owned()),
            materials: Set(vec!["Resin"].into()),
            colors: Set(vec!["Gray", "White"].into()),
            print_time: Set("4-6 hours".to_owned()),
            rating: Set(4.7),
            reviews: Set(256),
            in_stock: Set(true),
            featured: Set(true),
            ..Default::default()
        },
        product::ActiveModel {
            name: Set("Ergonomic Phone Stand".to_owned()),
            description: Set(
                "Sleek and functional phone stand with cable management. Compatible with all phone sizes.".to_owned(),
            ),
            price: Set(19.99),
            category: Set("Accessories".to_owned()),
            image: Set("product-stand.jpg".to_owned()),
            materials: Set(vec!["PLA", "PETG"].into()),
            colors: Set(vec!["Black", "White", "Navy"].into()),
            print_time: Set("3-4 hours".to_owned()),
            rating: Set(4.6),
            reviews: Set(312),
            in_stock: Set(true),
            featured: Set(true),
            ..Default::default()
        },
        product::ActiveModel {
            name: Set("Architectural Model Kit".to_owned()),
            description: Set(
                "Modular architectural building blocks for creating custom structures and cityscapes.".to_owned(),
            ),
            price: Set(79.99),
            category: Set("Prototypes".to_owned()),
            image: Set("product-vase.jpg".to_owned()),
            materials: Set(vec!["PLA", "Resin"].into()),
            colors: Set(vec!["White", "Gray"].into()),
            print_time: Set("12-16 hours".to_owned()),
            rating: Set(4.5),
            reviews: Set(67),
            in_stock: Set(true),
            featured: Set(false),
            ..Default::default()
        },
        product::ActiveModel {
            name: Set("Custom Keychain Set".to_owned()),
            description: Set(
                "Set of 5 customizable keychains. Perfect for gifts or promotional items.".to_owned(),
            ),
            price: Set(14.99),
            category: Set("Accessories".to_owned()),
            image: Set("product-stand.jpg".to_owned()),
            materials: Set(vec!["PLA"].into()),
            colors: Set(vec!["Multi-color available"].into()),
            print_time: Set("2-3 hours".to_owned()),
            rating: Set(4.4),
            reviews: Set(445),
            in_stock: Set(true),
            featured: Set(false),
            ..Default::default()
        },
    ];

    let count = catalog.len();
    let txn = db
        .begin()
        .await
        .expect("Failed to open transaction for catalog seeding");
    Product::insert_many(catalog)
        .exec(&txn)
        .await
        .expect("Failed to seed catalog");
    txn.commit().await.expect("Failed to commit catalog seed");
    info!(products = count, "Seeded storefront catalog");
}
