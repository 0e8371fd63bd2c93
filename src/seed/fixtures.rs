//! Reference data loaded by the seed scripts.

use crate::entities::user::UserRole;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone)]
pub struct LocationFixture {
    pub name: &'static str,
    pub address: &'static str,
    pub phone: Option<&'static str>,
    pub email: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct UserFixture {
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub role: UserRole,
    pub phone: Option<&'static str>,
    /// Home store, by location name
    pub location: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct BlogPostFixture {
    pub slug: &'static str,
    pub title: &'static str,
    pub excerpt: Option<&'static str>,
    pub content: &'static str,
    pub author: &'static str,
    pub tags: &'static [&'static str],
    /// `(year, month, day)`; `None` keeps the post as a draft
    pub published_on: Option<(i32, u32, u32)>,
}

#[derive(Debug, Clone)]
pub struct RepairTypeFixture {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub base_price: Decimal,
    pub estimated_minutes: i32,
}

/// Brand with the ad hoc id series fixtures refer to it by
#[derive(Debug, Clone)]
pub struct BrandFixture {
    pub original_id: i64,
    pub name: &'static str,
}

#[derive(Debug, Clone)]
pub struct SeriesFixture {
    pub original_id: i64,
    pub brand_original_id: i64,
    pub name: &'static str,
}

#[derive(Debug, Clone)]
pub struct ModelFixture {
    pub series_original_id: i64,
    pub name: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct DeviceFixtures {
    pub brands: Vec<BrandFixture>,
    pub series: Vec<SeriesFixture>,
    pub models: Vec<ModelFixture>,
}

pub fn locations() -> Vec<LocationFixture> {
    vec![
        LocationFixture {
            name: "Downtown",
            address: "120 Main Street, Springfield",
            phone: Some("+1-555-0100"),
            email: Some("downtown@repairshop.example"),
        },
        LocationFixture {
            name: "Westside Mall",
            address: "4500 West Avenue, Unit 12, Springfield",
            phone: Some("+1-555-0144"),
            email: Some("westside@repairshop.example"),
        },
        LocationFixture {
            name: "Airport Kiosk",
            address: "Terminal B, Springfield Regional Airport",
            phone: None,
            email: None,
        },
    ]
}

pub fn users() -> Vec<UserFixture> {
    vec![
        UserFixture {
            name: "Shop Admin",
            email: "admin@repairshop.example",
            password: "change-me-admin",
            role: UserRole::Admin,
            phone: None,
            location: None,
        },
        UserFixture {
            name: "Maria Lopez",
            email: "maria@repairshop.example",
            password: "change-me-staff",
            role: UserRole::Staff,
            phone: Some("+1-555-0101"),
            location: Some("Downtown"),
        },
        UserFixture {
            name: "Dev Patel",
            email: "dev@repairshop.example",
            password: "change-me-staff",
            role: UserRole::Staff,
            phone: Some("+1-555-0145"),
            location: Some("Westside Mall"),
        },
        UserFixture {
            name: "Jordan Smith",
            email: "jordan.smith@mail.example",
            password: "customer-pass",
            role: UserRole::Customer,
            phone: Some("+1-555-0199"),
            location: None,
        },
        UserFixture {
            name: "Alex Kim",
            email: "alex.kim@mail.example",
            password: "customer-pass",
            role: UserRole::Customer,
            phone: None,
            location: None,
        },
    ]
}

pub fn blog_posts() -> Vec<BlogPostFixture> {
    vec![
        BlogPostFixture {
            slug: "signs-your-phone-battery-needs-replacing",
            title: "5 Signs Your Phone Battery Needs Replacing",
            excerpt: Some("Sudden shutdowns and a swollen case are only the start."),
            content: "Lithium-ion batteries wear with every charge cycle. If your phone \
                      shuts down at 20%, gets hot while idle, or the screen lifts away \
                      from the frame, bring it in for a battery health check.",
            author: "Maria Lopez",
            tags: &["battery", "maintenance"],
            published_on: Some((2024, 3, 12)),
        },
        BlogPostFixture {
            slug: "cracked-screen-what-to-do-first",
            title: "Cracked Screen? What To Do First",
            excerpt: Some("Protect your data and your fingers before the repair."),
            content: "Back up your phone as soon as possible, cover the crack with clear \
                      tape, and avoid pressing on damaged areas. Most screen replacements \
                      are finished the same day.",
            author: "Dev Patel",
            tags: &["screen", "tips"],
            published_on: Some((2024, 5, 2)),
        },
        BlogPostFixture {
            slug: "water-damage-myths",
            title: "Water Damage Myths That Cost You Money",
            excerpt: Some("Rice will not save your phone."),
            content: "Rice does not pull moisture out of a sealed device. Power the phone \
                      off, do not charge it, and bring it in so corrosion can be cleaned \
                      from the board.",
            author: "Maria Lopez",
            tags: &["water-damage"],
            published_on: Some((2024, 7, 19)),
        },
        BlogPostFixture {
            slug: "choosing-refurbished-devices",
            title: "Choosing a Refurbished Device",
            excerpt: None,
            content: "Draft: grading scales, warranty terms and what we test before resale.",
            author: "Shop Admin",
            tags: &["refurbished"],
            published_on: None,
        },
    ]
}

pub fn repair_types() -> Vec<RepairTypeFixture> {
    vec![
        RepairTypeFixture {
            name: "Screen Replacement",
            description: Some("Replace cracked or unresponsive display assembly"),
            base_price: dec!(89.00),
            estimated_minutes: 60,
        },
        RepairTypeFixture {
            name: "Battery Replacement",
            description: Some("Swap worn battery and recalibrate"),
            base_price: dec!(59.00),
            estimated_minutes: 45,
        },
        RepairTypeFixture {
            name: "Charging Port Repair",
            description: Some("Clean or replace the charging port flex"),
            base_price: dec!(49.00),
            estimated_minutes: 45,
        },
        RepairTypeFixture {
            name: "Water Damage Treatment",
            description: Some("Ultrasonic board cleaning and diagnostics"),
            base_price: dec!(79.00),
            estimated_minutes: 120,
        },
        RepairTypeFixture {
            name: "Back Glass Replacement",
            description: None,
            base_price: dec!(99.00),
            estimated_minutes: 90,
        },
        RepairTypeFixture {
            name: "Diagnostics",
            description: Some("Full hardware test; fee waived if repaired"),
            base_price: dec!(25.00),
            estimated_minutes: 30,
        },
    ]
}

pub fn device_hierarchy() -> DeviceFixtures {
    DeviceFixtures {
        brands: vec![
            BrandFixture {
                original_id: 1,
                name: "Apple",
            },
            BrandFixture {
                original_id: 2,
                name: "Samsung",
            },
            BrandFixture {
                original_id: 3,
                name: "Google",
            },
        ],
        series: vec![
            SeriesFixture {
                original_id: 10,
                brand_original_id: 1,
                name: "iPhone",
            },
            SeriesFixture {
                original_id: 11,
                brand_original_id: 1,
                name: "iPad",
            },
            SeriesFixture {
                original_id: 20,
                brand_original_id: 2,
                name: "Galaxy S",
            },
            SeriesFixture {
                original_id: 21,
                brand_original_id: 2,
                name: "Galaxy A",
            },
            SeriesFixture {
                original_id: 30,
                brand_original_id: 3,
                name: "Pixel",
            },
        ],
        models: [
            (10, "iPhone 13"),
            (10, "iPhone 14"),
            (10, "iPhone 15"),
            (10, "iPhone 15 Pro"),
            (11, "iPad Air (5th generation)"),
            (11, "iPad (10th generation)"),
            (20, "Galaxy S22"),
            (20, "Galaxy S23"),
            (20, "Galaxy S24"),
            (21, "Galaxy A54"),
            (21, "Galaxy A15"),
            (30, "Pixel 7"),
            (30, "Pixel 8"),
            (30, "Pixel 8 Pro"),
        ]
        .into_iter()
        .map(|(series_original_id, name)| ModelFixture {
            series_original_id,
            name,
        })
        .collect(),
    }
}
