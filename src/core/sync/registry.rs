//! Entity loader registry

use super::loaders::{EntityLoader, InsertionOrderLoader, LineItemLoader};
use crate::utils::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of feed rows a load can start from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    InsertionOrder,
    LineItem,
}

impl EntityType {
    pub const ALL: [EntityType; 2] = [Self::InsertionOrder, Self::LineItem];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsertionOrder => "insertion_order",
            Self::LineItem => "line_item",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == normalized)
            .ok_or_else(|| format!("Unknown entity type: {}", s))
    }
}

type LoaderFactory = fn() -> Box<dyn EntityLoader>;

fn insertion_order_loader() -> Box<dyn EntityLoader> {
    Box::new(InsertionOrderLoader)
}

fn line_item_loader() -> Box<dyn EntityLoader> {
    Box::new(LineItemLoader)
}

fn factory(entity: EntityType) -> LoaderFactory {
    match entity {
        EntityType::InsertionOrder => insertion_order_loader,
        EntityType::LineItem => line_item_loader,
    }
}

/// Loaders enabled for this run, populated once at startup
#[derive(Clone)]
pub struct LoaderRegistry {
    factories: Vec<(EntityType, LoaderFactory)>,
}

impl LoaderRegistry {
    pub fn from_config(entities: &[EntityType]) -> Self {
        let mut factories: Vec<(EntityType, LoaderFactory)> = Vec::new();
        for entity in entities {
            if !factories.iter().any(|(e, _)| e == entity) {
                factories.push((*entity, factory(*entity)));
            }
        }
        Self { factories }
    }

    pub fn entities(&self) -> Vec<EntityType> {
        self.factories.iter().map(|(e, _)| *e).collect()
    }

    pub fn loader(&self, entity: EntityType) -> Result<Box<dyn EntityLoader>> {
        self.factories
            .iter()
            .find(|(e, _)| *e == entity)
            .map(|(_, make)| make())
            .ok_or_else(|| SyncError::config(format!("Entity loader not enabled: {}", entity)))
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::from_config(&EntityType::ALL)
    }
}
