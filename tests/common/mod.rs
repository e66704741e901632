//! Shared test fixture: an entity with nested records, nullable members,
//! and enum fields.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use entity_query::{
    EnumField, FieldAccess, FieldKind, FieldType, FieldValue, Queryable, Record,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestEnum {
    One,
    Two,
}

impl EnumField for TestEnum {
    const TYPE_NAME: &'static str = "TestEnum";

    fn discriminant(self) -> i64 {
        self as i64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestEntity {
    pub id: i64,
    pub id_int: i64,
    pub id_string: Option<String>,
    pub enum_value: TestEnum,
    pub maybe_enum_value: Option<TestEnum>,
    pub name: Option<String>,
    pub group: Option<i64>,
    pub sometime: DateTime<Utc>,
    pub maybe_sometime: Option<DateTime<Utc>>,
    pub child: Option<Box<TestEntity>>,
}

impl TestEntity {
    pub fn new() -> Self {
        Self {
            id: 0,
            id_int: 0,
            id_string: None,
            enum_value: TestEnum::One,
            maybe_enum_value: None,
            name: None,
            group: None,
            sometime: base_time(),
            maybe_sometime: None,
            child: None,
        }
    }
}

impl Record for TestEntity {
    fn get(&self, field: &str) -> FieldAccess<'_> {
        match field {
            "id" => FieldAccess::Value(self.id.into()),
            "id_int" => FieldAccess::Value(self.id_int.into()),
            "id_string" => FieldAccess::Value(self.id_string.clone().into()),
            "enum_value" => FieldAccess::Value(self.enum_value.to_value()),
            "maybe_enum_value" => FieldAccess::Value(
                self.maybe_enum_value
                    .map(|e| e.to_value())
                    .unwrap_or(FieldValue::Null),
            ),
            "name" => FieldAccess::Value(self.name.clone().into()),
            "group" => FieldAccess::Value(self.group.into()),
            "sometime" => FieldAccess::Value(self.sometime.into()),
            "maybe_sometime" => FieldAccess::Value(self.maybe_sometime.into()),
            "child" => match &self.child {
                Some(child) => FieldAccess::Nested(child.as_ref()),
                None => FieldAccess::Missing,
            },
            _ => FieldAccess::Missing,
        }
    }
}

impl Queryable for TestEntity {
    fn field_type(field: &str) -> Option<FieldType> {
        Some(match field {
            "id" => FieldType::scalar(FieldKind::Int),
            "id_int" => FieldType::scalar(FieldKind::Int),
            "id_string" => FieldType::nullable(FieldKind::Text),
            "enum_value" => FieldType::scalar(FieldKind::Enum(TestEnum::TYPE_NAME)),
            "maybe_enum_value" => FieldType::nullable(FieldKind::Enum(TestEnum::TYPE_NAME)),
            "name" => FieldType::nullable(FieldKind::Text),
            "group" => FieldType::nullable(FieldKind::Int),
            "sometime" => FieldType::scalar(FieldKind::DateTime),
            "maybe_sometime" => FieldType::nullable(FieldKind::DateTime),
            "child" => FieldType::nullable(FieldKind::Nested(Self::field_type)),
            _ => return None,
        })
    }
}

/// Fixed base timestamp so the fixtures are deterministic.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2013, 1, 15, 12, 0, 0).unwrap()
}

pub fn s(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub fn child(id_int: i64, id_string: &str) -> Option<Box<TestEntity>> {
    Some(Box::new(TestEntity {
        id_int,
        id_string: s(id_string),
        ..TestEntity::new()
    }))
}

/// The canonical four-record fixture used by most filter scenarios.
pub fn anna_entities() -> Vec<TestEntity> {
    vec![
        TestEntity {
            id_int: 2,
            id_string: s("2"),
            name: s("Ahnna"),
            child: child(12, "12"),
            ..TestEntity::new()
        },
        TestEntity {
            id_int: 4,
            id_string: s("4"),
            name: s("Hanna"),
            child: child(3, "3"),
            ..TestEntity::new()
        },
        TestEntity {
            id_int: 3,
            id_string: s("3"),
            name: s("Vanna"),
            child: child(15, "15"),
            ..TestEntity::new()
        },
        TestEntity {
            id_int: 1,
            id_string: s("1"),
            name: s("Manna"),
            child: child(2, "2"),
            ..TestEntity::new()
        },
    ]
}
