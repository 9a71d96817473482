//! Quote pricing for custom prints and shipping for carts/orders.
//!
//! Everything here is pure arithmetic over the fixed storefront tables, so
//! the handlers stay thin and the numbers are testable without a database.

use serde::Serialize;

/// Base price of a custom print before material/infill/quantity scaling.
pub const BASE_PRICE: f32 = 15.0;

/// Flat shipping fee applied below the free-shipping threshold.
pub const SHIPPING_FEE: f32 = 5.99;

/// Orders with a subtotal above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: f32 = 50.0;

pub const INFILL_MIN: u32 = 10;
pub const INFILL_MAX: u32 = 100;
pub const INFILL_STEP: u32 = 5;

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Material {
    pub name: &'static str,
    pub description: &'static str,
    pub multiplier: f32,
}

pub const MATERIALS: [Material; 5] = [
    Material { name: "PLA", description: "Biodegradable, great surface finish", multiplier: 1.0 },
    Material { name: "ABS", description: "Durable, heat resistant", multiplier: 1.2 },
    Material { name: "PETG", description: "Strong, chemical resistant", multiplier: 1.3 },
    Material { name: "Resin", description: "Ultra-detailed, smooth finish", multiplier: 1.8 },
    Material { name: "Nylon", description: "Flexible, wear resistant", multiplier: 1.5 },
];

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Color {
    pub name: &'static str,
    pub hex: &'static str,
}

pub const COLORS: [Color; 8] = [
    Color { name: "White", hex: "#ffffff" },
    Color { name: "Black", hex: "#1a1a1a" },
    Color { name: "Gray", hex: "#6b7280" },
    Color { name: "Red", hex: "#ef4444" },
    Color { name: "Blue", hex: "#3b82f6" },
    Color { name: "Green", hex: "#22c55e" },
    Color { name: "Gold", hex: "#eab308" },
    Color { name: "Silver", hex: "#a1a1aa" },
];

pub fn find_material(name: &str) -> Option<&'static Material> {
    MATERIALS.iter().find(|material| material.name == name)
}

/// Infill is offered as a slider from 10% to 100% in 5% steps.
pub fn infill_is_valid(infill: u32) -> bool {
    (INFILL_MIN..=INFILL_MAX).contains(&infill) && infill % INFILL_STEP == 0
}

/// Quote for a custom print. Non-positive quantity is clamped to 1.
pub fn quote_price(multiplier: f32, infill: u32, quantity: u32) -> f32 {
    let quantity = quantity.max(1);
    BASE_PRICE * multiplier * (1.0 + infill as f32 / 100.0) * quantity as f32
}

pub fn shipping_fee(subtotal: f32) -> f32 {
    if subtotal > FREE_SHIPPING_THRESHOLD {
        0.0
    } else {
        SHIPPING_FEE
    }
}
