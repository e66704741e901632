//! End-to-end filter scenarios: builder → compiler → application, with
//! pinned match counts per fixture.

mod common;

use common::{anna_entities, base_time, child, s, TestEntity, TestEnum};
use entity_query::{
    ops, EntityFilter, EntityQueryExt, EnumField, FieldValue, FilterCombination, FilterMatch,
    QueryError,
};
use pretty_assertions::assert_eq;

fn count(entities: &[TestEntity], filter: &EntityFilter<TestEntity>) -> usize {
    entities
        .iter()
        .cloned()
        .filter_by_rules(filter)
        .unwrap()
        .count()
}

#[test]
fn strings_filtering() {
    let source = anna_entities();

    // Case-insensitive Like on a text property.
    let filter = EntityFilter::new()
        .and_matching("name", "ANNA", FilterMatch::Like)
        .unwrap();
    assert_eq!(count(&source, &filter), 3);

    // Exact match.
    let filter = EntityFilter::new().and("id_string", "2").unwrap();
    assert_eq!(count(&source, &filter), 1);

    // Like through a nested path: children "12" and "2" match.
    let filter = EntityFilter::new()
        .and_matching("child.id_string", "2", FilterMatch::Like)
        .unwrap();
    assert_eq!(count(&source, &filter), 2);

    // Chain with AND: the one entity whose child is "2" and name has "manna".
    let filter = EntityFilter::new()
        .and("child.id_string", "2")
        .unwrap()
        .and_matching("name", "manna", FilterMatch::Like)
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    // Chain with OR: four annas plus two matching children, still four rows.
    let filter = EntityFilter::new()
        .and_matching("child.id_string", "2", FilterMatch::Like)
        .unwrap()
        .or_matching("name", "anna", FilterMatch::Like)
        .unwrap();
    assert_eq!(count(&source, &filter), 4);

    // OR with a case-sensitive exact match: no lowercase "anna" exists.
    let filter = EntityFilter::new()
        .and("child.id_string", "2")
        .unwrap()
        .add("name", "anna", FilterCombination::Or, FilterMatch::Equal, true, false)
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    // NotEqual.
    let filter = EntityFilter::new()
        .and_matching("child.id_string", "2", FilterMatch::NotEqual)
        .unwrap();
    assert_eq!(count(&source, &filter), 3);
}

struct ValHolder {
    val: i64,
}

#[test]
fn numeric_filtering() {
    let source = anna_entities();

    // Comparison expressions are the recommended surface.
    let filter = EntityFilter::new()
        .and_where(ops::eq("id_int", 3))
        .unwrap()
        .and_where(ops::eq("id_int", 1))
        .unwrap();
    assert_eq!(count(&source, &filter), 0);

    let filter = EntityFilter::new()
        .and_where(ops::gt("id_int", 1))
        .unwrap()
        .and_where(ops::lt("id_int", 3))
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    // No integer lies strictly between 2 and 3.
    let filter = EntityFilter::new()
        .and_where(ops::gt("id_int", 2))
        .unwrap()
        .and_where(ops::lt("id_int", 3))
        .unwrap();
    assert_eq!(count(&source, &filter), 0);

    let filter = EntityFilter::new()
        .and_where(ops::gte("id_int", 1))
        .unwrap()
        .and_where(ops::lte("id_int", 3))
        .unwrap();
    assert_eq!(count(&source, &filter), 3);

    let filter = EntityFilter::new().and_where(ops::ne("id_int", 1)).unwrap();
    assert_eq!(count(&source, &filter), 3);

    // The field/value/match surface behaves identically.
    let filter = EntityFilter::new().and("id_int", 4).unwrap();
    assert_eq!(count(&source, &filter), 1);

    let filter = EntityFilter::new()
        .and_matching("id_int", 2, FilterMatch::Greater)
        .unwrap();
    assert_eq!(count(&source, &filter), 2);

    let filter = EntityFilter::new()
        .and_matching("id_int", 2, FilterMatch::GreaterOrEqual)
        .unwrap();
    assert_eq!(count(&source, &filter), 3);

    let filter = EntityFilter::new()
        .and_matching("id_int", 2, FilterMatch::Less)
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    let filter = EntityFilter::new()
        .and_matching("id_int", 2, FilterMatch::LessOrEqual)
        .unwrap();
    assert_eq!(count(&source, &filter), 2);

    // AND combinations.
    let filter = EntityFilter::new()
        .and_matching("id_int", 2, FilterMatch::Less)
        .unwrap()
        .and_matching("id_int", 1, FilterMatch::Greater)
        .unwrap();
    assert_eq!(count(&source, &filter), 0);

    let filter = EntityFilter::new()
        .and_matching("id_int", 3, FilterMatch::Less)
        .unwrap()
        .and_matching("id_int", 1, FilterMatch::Greater)
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    // OR combination.
    let filter = EntityFilter::new()
        .and_matching("id_int", 3, FilterMatch::Less)
        .unwrap()
        .or_matching("id_int", 1, FilterMatch::Greater)
        .unwrap();
    assert_eq!(count(&source, &filter), 4);

    // Contradiction.
    let filter = EntityFilter::new()
        .and("id_int", 3)
        .unwrap()
        .and("id_int", 1)
        .unwrap();
    assert_eq!(count(&source, &filter), 0);

    // Values coming out of arrays and nested structs.
    let vals = [ValHolder { val: 1 }, ValHolder { val: 2 }];
    let vals_array = [1i64, 2];

    let filter = EntityFilter::new()
        .and_where(ops::eq("id_int", vals[0].val))
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    let filter = EntityFilter::new()
        .and_where(ops::eq("id_int", vals_array[0]))
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    let filter = EntityFilter::new()
        .and_where(ops::eq("id_int", vals_array[vals[0].val as usize]))
        .unwrap();
    let matched: Vec<TestEntity> = source
        .iter()
        .cloned()
        .filter_by_rules(&filter)
        .unwrap()
        .collect();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id_int, 2);
}

fn null_entities() -> Vec<TestEntity> {
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
            id_string: None,
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
            id_string: s("21"),
            name: s("Manna"),
            child: child(2, "2"),
            ..TestEntity::new()
        },
        // Null name exercises the coalesce guard.
        TestEntity {
            id_int: 1,
            id_string: None,
            name: None,
            child: child(2, "2"),
            ..TestEntity::new()
        },
    ]
}

#[test]
fn null_filtering() {
    let source = null_entities();

    let filter = EntityFilter::new().and("id_string", FieldValue::Null).unwrap();
    assert_eq!(count(&source, &filter), 2);

    let filter = EntityFilter::new()
        .and_where(ops::eq("id_string", Option::<&str>::None))
        .unwrap();
    assert_eq!(count(&source, &filter), 2);

    let filter = EntityFilter::new()
        .and_where(ops::ne("id_string", FieldValue::Null))
        .unwrap();
    assert_eq!(count(&source, &filter), 3);

    // The null name must coalesce instead of failing the comparison.
    let filter = EntityFilter::new()
        .and_where(ops::eq("name", "Hanna"))
        .unwrap();
    assert_eq!(count(&source, &filter), 1);
}

#[test]
fn specification_validation() {
    // Bad filter start: And on an empty filter without silent creation.
    let err = EntityFilter::<TestEntity>::new()
        .add("child.id_int", "2", FilterCombination::And, FilterMatch::Equal, false, false)
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidSpecification(_)));

    // With silent creation it passes, and the first rule is fixed to None.
    let filter = EntityFilter::<TestEntity>::new()
        .add("child.id_int", "2", FilterCombination::And, FilterMatch::Equal, false, true)
        .unwrap();
    assert_eq!(
        filter.flattened_rules()[0].read().combination,
        FilterCombination::None
    );

    // Bad filter append: None after the first rule.
    let err = EntityFilter::<TestEntity>::new()
        .add("child.id_int", "2", FilterCombination::None, FilterMatch::Equal, false, false)
        .unwrap()
        .add("child.id_int", "2", FilterCombination::None, FilterMatch::Equal, false, false)
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidSpecification(_)));

    // Case sensitivity on a non-text value.
    let err = EntityFilter::<TestEntity>::new()
        .add("child.id_int", 22, FilterCombination::None, FilterMatch::Equal, true, false)
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidOperator(_)));

    // Like on a non-text value.
    let err = EntityFilter::<TestEntity>::new()
        .and_matching("child.id_int", 22, FilterMatch::Like)
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidOperator(_)));

    // Ordering on a text value.
    let err = EntityFilter::<TestEntity>::new()
        .and_matching("name", "anna", FilterMatch::Greater)
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidOperator(_)));

    // Ordering on a null value.
    let err = EntityFilter::<TestEntity>::new()
        .and_matching("name", FieldValue::Null, FilterMatch::Greater)
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidOperator(_)));

    // Null against a non-nullable member builds, but cannot compile.
    let filter = EntityFilter::<TestEntity>::new()
        .and("id_int", FieldValue::Null)
        .unwrap();
    assert!(matches!(
        filter.compile().unwrap_err(),
        QueryError::TypeMismatch { .. }
    ));
}

#[test]
fn flattened_rule_mutation_is_observed_by_recompilation() {
    let source = vec![
        TestEntity { id_int: 2, id_string: s("2"), name: s("Anna"), child: child(12, "12"), ..TestEntity::new() },
        TestEntity { id_int: 4, id_string: s("4"), name: s("Hanna"), child: child(3, "3"), ..TestEntity::new() },
        TestEntity { id_int: 3, id_string: s("3"), name: s("Vahunna"), child: child(15, "15"), ..TestEntity::new() },
        TestEntity { id_int: 1, id_string: s("1"), name: s("Manna"), child: child(2, "2"), ..TestEntity::new() },
    ];

    // Case-insensitive equality finds the one exact "Anna".
    let filter = EntityFilter::new().and("name", "ANNA").unwrap();
    assert_eq!(count(&source, &filter), 1);

    // Find the rule, flip it to Like by reference, and recompile.
    let rules = filter.flattened_rules();
    let name_rule = rules
        .iter()
        .find(|r| {
            let r = r.read();
            r.name == "name" && r.match_kind == FilterMatch::Equal
        })
        .expect("rule should be discoverable");
    name_rule.write().match_kind = FilterMatch::Like;
    assert_eq!(count(&source, &filter), 3);

    // The same works when the rule sits deep inside a group.
    let filter = EntityFilter::new()
        .and_group(EntityFilter::new().and("name", "ANNA").unwrap())
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    let rules = filter.flattened_rules();
    let name_rule = rules
        .iter()
        .find(|r| {
            let r = r.read();
            r.name == "name" && r.match_kind == FilterMatch::Equal
        })
        .expect("rule inside a group should be discoverable");
    name_rule.write().match_kind = FilterMatch::Like;
    assert_eq!(count(&source, &filter), 3);
}

fn group_entities() -> Vec<TestEntity> {
    vec![
        TestEntity { id_int: 2, id_string: s("2"), name: s("Ahnna"), child: child(12, "12"), ..TestEntity::new() },
        TestEntity { id_int: 4, id_string: None, name: s("Hanna"), child: child(3, "3"), ..TestEntity::new() },
        TestEntity { id_int: 3, id_string: s("3"), name: s("Vanna"), child: child(15, "15"), ..TestEntity::new() },
        TestEntity { id_int: 1, id_string: s("21"), name: s("Manna"), child: child(2, "2"), ..TestEntity::new() },
    ]
}

#[test]
fn group_precedence() {
    let source = group_entities();

    // Without an explicit group the chain re-associates left to right:
    // id == 1 or id == 3 and id > 2  =>  (id == 1 or id == 3) and id > 2
    let filter = EntityFilter::new()
        .and("id_int", 1)
        .unwrap()
        .or("id_int", 3)
        .unwrap()
        .and_matching("id_int", 2, FilterMatch::Greater)
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    // id > 2 and id == 3 or id == 1  =>  (id > 2 and id == 3) or id == 1
    let filter = EntityFilter::new()
        .and_matching("id_int", 2, FilterMatch::Greater)
        .unwrap()
        .and("id_int", 3)
        .unwrap()
        .or("id_int", 1)
        .unwrap();
    assert_eq!(count(&source, &filter), 2);

    // Explicit group: id > 2 and (id == 3 or id == 1)
    let filter = EntityFilter::new()
        .and_matching("id_int", 2, FilterMatch::Greater)
        .unwrap()
        .and_group(
            EntityFilter::new().and("id_int", 3).unwrap().or("id_int", 1).unwrap(),
        )
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    // Group plus trailing OR: id > 2 and (id == 3 or id == 1) or id_string == null
    let filter = EntityFilter::new()
        .and_matching("id_int", 2, FilterMatch::Greater)
        .unwrap()
        .and_group(
            EntityFilter::new().and("id_int", 3).unwrap().or("id_int", 1).unwrap(),
        )
        .unwrap()
        .or("id_string", FieldValue::Null)
        .unwrap();
    assert_eq!(count(&source, &filter), 2);

    // Flat chain of the same rules regroups differently:
    // ((id > 2 and id == 3) or id == 1) or id_string == null
    let filter = EntityFilter::new()
        .and_matching("id_int", 2, FilterMatch::Greater)
        .unwrap()
        .and("id_int", 3)
        .unwrap()
        .or("id_int", 1)
        .unwrap()
        .or("id_string", FieldValue::Null)
        .unwrap();
    assert_eq!(count(&source, &filter), 3);

    // The comparison-expression surface produces the same trees.
    let filter = EntityFilter::new()
        .and_where(ops::gt("id_int", 2))
        .unwrap()
        .and_group(
            EntityFilter::new()
                .and_where(ops::eq("id_int", 3))
                .unwrap()
                .or_where(ops::eq("id_int", 1))
                .unwrap(),
        )
        .unwrap()
        .or_where(ops::eq("id_string", FieldValue::Null))
        .unwrap();
    assert_eq!(count(&source, &filter), 2);

    let filter = EntityFilter::new()
        .and_where(ops::gt("id_int", 2))
        .unwrap()
        .and_group(
            EntityFilter::new()
                .and_where(ops::eq("id_int", 3))
                .unwrap()
                .or_where(ops::eq("id_int", 1))
                .unwrap(),
        )
        .unwrap();
    assert_eq!(count(&source, &filter), 1);
}

#[test]
fn captured_constants_and_deep_paths() {
    let source = vec![
        TestEntity { id: 2, id_string: s("2"), name: s("Ahnna"), child: child(12, "12"), ..TestEntity::new() },
        TestEntity { id: 4, id_string: None, name: s("Hanna"), child: child(3, "3"), ..TestEntity::new() },
        TestEntity { id: 3, id_string: s("3"), name: s("Vanna"), child: child(15, "15"), ..TestEntity::new() },
        TestEntity { id: 1, id_string: s("21"), name: s("Manna"), child: child(2, "2"), ..TestEntity::new() },
    ];

    // Deep path with an ordering comparison.
    let filter = EntityFilter::new()
        .and_where(ops::gt("child.id_int", 12))
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    // Constants captured from locals.
    let constant2: i64 = 2;
    let constant1: i64 = 1;

    let filter = EntityFilter::new()
        .and_matching("id", constant2, FilterMatch::Greater)
        .unwrap()
        .and("id", 3)
        .unwrap()
        .or("id", 1)
        .unwrap()
        .or("id_string", FieldValue::Null)
        .unwrap();
    assert_eq!(count(&source, &filter), 3);

    let filter = EntityFilter::new()
        .and_where(ops::gt("id", constant2))
        .unwrap()
        .and_where(ops::eq("id", 3))
        .unwrap()
        .or_where(ops::eq("id", constant1))
        .unwrap()
        .or("id_string", FieldValue::Null)
        .unwrap();
    assert_eq!(count(&source, &filter), 3);
}

#[test]
fn comparing_against_another_record_field() {
    let source = vec![
        TestEntity { id: 2, id_string: s("2"), name: s("Ahnna"), child: child(12, "12"), ..TestEntity::new() },
        TestEntity { id: 0, id_string: None, name: s("Hanna"), child: child(3, "3"), ..TestEntity::new() },
        TestEntity { id: 3, id_string: s("3"), name: s("Vanna"), child: child(15, "15"), ..TestEntity::new() },
        TestEntity { id: 1, id_string: s("21"), name: s("Manna"), child: child(2, "2"), ..TestEntity::new() },
    ];

    let mut compare_to = TestEntity::new();
    compare_to.id = 0;
    let filter = EntityFilter::new()
        .and_where(ops::ne("id", compare_to.id))
        .unwrap();
    assert_eq!(count(&source, &filter), 3);

    compare_to.id = 3;
    let filter = EntityFilter::new()
        .and_where(ops::ne("id", compare_to.id))
        .unwrap();
    assert_eq!(count(&source, &filter), 3);
}

#[test]
fn if_not_null_shorthands() {
    let filter = EntityFilter::<TestEntity>::new()
        .and_if_not_null("child.id_string", "2")
        .unwrap()
        .or_if_not_null("child.id_string", "")
        .unwrap()
        .and_if_not_null("child.id_string", Option::<&str>::None)
        .unwrap();

    // Only two rules were created, and the first was fixed to None.
    let rules = filter.flattened_rules();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].read().combination, FilterCombination::None);
    assert_eq!(rules[1].read().combination, FilterCombination::Or);

    // Same through the comparison-expression surface.
    let filter = EntityFilter::<TestEntity>::new()
        .and_where_if_not_null(ops::eq("child.id_string", "2"))
        .unwrap()
        .or_where_if_not_null(ops::eq("child.id_string", ""))
        .unwrap()
        .and_where_if_not_null(ops::eq("child.id_string", Option::<&str>::None))
        .unwrap();

    let rules = filter.flattened_rules();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].read().combination, FilterCombination::None);
    assert_eq!(rules[1].read().combination, FilterCombination::Or);
}

#[test]
fn nullable_datetime_range() {
    use chrono::Datelike;

    let dt = |day: u32| base_time().with_day(day);

    let source = vec![
        TestEntity { maybe_sometime: None, id_int: 2, id_string: s("2"), name: s("Ahnna"), child: child(12, "12"), ..TestEntity::new() },
        TestEntity { maybe_sometime: dt(22), id_int: 4, id_string: None, name: s("Hanna"), child: child(3, "3"), ..TestEntity::new() },
        TestEntity { maybe_sometime: dt(12), id_int: 3, id_string: s("3"), name: s("Vanna"), child: child(15, "15"), ..TestEntity::new() },
        TestEntity { maybe_sometime: None, id_int: 1, id_string: s("21"), name: s("Manna"), child: child(2, "2"), ..TestEntity::new() },
    ];

    let start = base_time().with_day(1);
    let end = base_time().with_day(31);

    let filter = EntityFilter::new()
        .and_where_if_not_null(ops::gte("maybe_sometime", start))
        .unwrap()
        .and_where_if_not_null(ops::lte("maybe_sometime", end))
        .unwrap();

    assert_eq!(count(&source, &filter), 2);
}

fn starts_ends_entities() -> Vec<TestEntity> {
    vec![
        TestEntity { id_int: 2, id_string: s("2"), name: s("Ahnnah"), child: child(12, "12"), ..TestEntity::new() },
        TestEntity { id_int: 4, id_string: s("4"), name: s("Hanna"), child: child(3, "3"), ..TestEntity::new() },
        TestEntity { id_int: 3, id_string: s("3"), name: None, child: child(15, "15"), ..TestEntity::new() },
        TestEntity { id_int: 1, id_string: s("1"), name: s("Mannah"), child: child(2, "2"), ..TestEntity::new() },
    ]
}

#[test]
fn starts_with_and_ends_with() {
    let source = starts_ends_entities();

    let filter = EntityFilter::new()
        .and_matching("name", "A", FilterMatch::StartsWith)
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    let filter = EntityFilter::new()
        .and_matching("name", "ah", FilterMatch::EndsWith)
        .unwrap();
    assert_eq!(count(&source, &filter), 2);

    // Case-sensitive variants match nothing in this fixture.
    let filter = EntityFilter::new()
        .add("name", "a", FilterCombination::None, FilterMatch::StartsWith, true, false)
        .unwrap();
    assert_eq!(count(&source, &filter), 0);

    let filter = EntityFilter::new()
        .add("name", "AH", FilterCombination::None, FilterMatch::EndsWith, true, false)
        .unwrap();
    assert_eq!(count(&source, &filter), 0);
}

#[test]
fn case_sensitive_like_with_null_member() {
    let source = starts_ends_entities();

    // The null name coalesces to empty instead of failing; "anna" appears
    // in "Hanna" and "Mannah" with exact casing.
    let filter = EntityFilter::new()
        .add("name", "anna", FilterCombination::None, FilterMatch::Like, true, false)
        .unwrap();
    assert_eq!(count(&source, &filter), 2);
}

fn enum_entities() -> Vec<TestEntity> {
    vec![
        TestEntity { id_int: 2, enum_value: TestEnum::One, id_string: s("2"), name: s("Ahnnah"), child: child(12, "12"), ..TestEntity::new() },
        TestEntity { id_int: 4, enum_value: TestEnum::Two, id_string: s("4"), name: s("Hanna"), child: child(3, "3"), ..TestEntity::new() },
        TestEntity { id_int: 3, enum_value: TestEnum::Two, maybe_enum_value: Some(TestEnum::Two), id_string: s("3"), name: s("Vanna"), child: child(15, "15"), ..TestEntity::new() },
        TestEntity { id_int: 1, enum_value: TestEnum::One, id_string: s("1"), name: s("Mannah"), child: child(2, "2"), ..TestEntity::new() },
    ]
}

#[test]
fn enum_filtering() {
    let source = enum_entities();

    let filter = EntityFilter::new()
        .and("enum_value", TestEnum::Two.to_value())
        .unwrap();
    assert_eq!(count(&source, &filter), 2);

    let filter = EntityFilter::new()
        .and_where(ops::eq("enum_value", TestEnum::Two.to_value()))
        .unwrap();
    assert_eq!(count(&source, &filter), 2);

    // Nullable enum member.
    let filter = EntityFilter::new()
        .and("maybe_enum_value", TestEnum::Two.to_value())
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    let filter = EntityFilter::new()
        .and_where(ops::eq("maybe_enum_value", TestEnum::Two.to_value()))
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    // A search model carrying an optional enum.
    let mut maybe_enum: Option<TestEnum> = None;
    let filter = EntityFilter::new()
        .and_where(ops::eq("maybe_enum_value", maybe_enum.map(|e| e.to_value())))
        .unwrap();
    assert_eq!(count(&source, &filter), 3);

    maybe_enum = Some(TestEnum::Two);
    let filter = EntityFilter::new()
        .and_where(ops::eq("maybe_enum_value", maybe_enum.map(|e| e.to_value())))
        .unwrap();
    assert_eq!(count(&source, &filter), 1);

    // Integer literals lift to the member's enum type, nullable or not.
    let filter = EntityFilter::new().and("enum_value", 1i64).unwrap();
    assert_eq!(count(&source, &filter), 2);

    let filter = EntityFilter::new().and("maybe_enum_value", 1i64).unwrap();
    assert_eq!(count(&source, &filter), 1);
}

#[test]
fn serialized_specification_round_trip() {
    let source = anna_entities();

    let filter = EntityFilter::<TestEntity>::new()
        .and_matching("name", "ANNA", FilterMatch::Like)
        .unwrap()
        .and_group(
            EntityFilter::new()
                .and_where(ops::eq("id_int", 3))
                .unwrap()
                .or_where(ops::eq("id_int", 4))
                .unwrap(),
        )
        .unwrap();

    let json = serde_json::to_string(&filter).unwrap();
    let restored: EntityFilter<TestEntity> = serde_json::from_str(&json).unwrap();

    assert_eq!(count(&source, &filter), count(&source, &restored));
    assert_eq!(count(&source, &restored), 2);
}

#[test]
fn mutated_flattened_rules_match_a_fresh_specification() {
    let source = anna_entities();

    // Mutate an extracted rule, then build the same rule set from scratch;
    // both must compile to the same result.
    let mutated = EntityFilter::new().and("name", "HANNA").unwrap();
    mutated.flattened_rules()[0].write().match_kind = FilterMatch::Like;

    let fresh = EntityFilter::new()
        .and_matching("name", "HANNA", FilterMatch::Like)
        .unwrap();

    assert_eq!(count(&source, &mutated), count(&source, &fresh));
    assert_eq!(count(&source, &mutated), 1);
}
