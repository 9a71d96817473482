use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: f32,
    pub category: String,
    pub image: String,
    #[sea_orm(column_type = "Json")]
    pub materials: StringList,
    #[sea_orm(column_type = "Json")]
    pub colors: StringList,
    pub print_time: String,
    pub rating: f32,
    pub reviews: i32,
    #[sea_orm(default = true)]
    pub in_stock: bool,
    #[sea_orm(default = false)]
    pub featured: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// JSON-backed list column for the material and color variants of a product.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringList(pub Vec<String>);

impl StringList {
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|entry| entry == value)
    }
}

impl From<Vec<&str>> for StringList {
    fn from(values: Vec<&str>) -> Self {
        StringList(values.into_iter().map(str::to_owned).collect())
    }
}
