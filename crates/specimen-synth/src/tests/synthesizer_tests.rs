use super::*;
use crate::activator::ActivationError;
use crate::config::GuidStrategy;
use crate::registry::ResolutionPolicy;
use crate::types::{ConstructorInfo, ObjectShape, ParamInfo, ScalarKind, TypeShape};
use crate::universe::TypeUniverse;
use crate::value::{Decimal, Rgba};
use specimen_common::DiagnosticCategory;

fn s(text: &str) -> Value {
    Value::String(text.to_string())
}

fn order(db: &TypeUniverse) -> TypeId {
    db.declare_with(
        "Order",
        TypeShape::Object(
            ObjectShape::record()
                .with_field("Name", TypeId::STRING)
                .with_field("Count", TypeId::INT)
                .with_field("Flag", TypeId::BOOL),
        ),
    )
}

fn count_code(diagnostics: &Diagnostics, code: u32) -> usize {
    diagnostics.iter().filter(|d| d.code == code).count()
}

// =============================================================================
// Records
// =============================================================================

#[test]
fn test_mutable_record_is_fully_populated() {
    let db = TypeUniverse::new();
    let order = order(&db);

    let synthesis = Synthesizer::new(&db).synthesize(order);
    let value = synthesis.value.expect("value");

    assert_eq!(value.field("Name"), Some(&s("test")));
    assert_eq!(value.field("Count"), Some(&Value::Int(42)));
    assert_eq!(value.field("Flag"), Some(&Value::Bool(true)));
    assert!(synthesis.diagnostics.is_empty());
}

#[test]
fn test_synthesis_is_deterministic_with_fixed_guids() {
    let db = TypeUniverse::new();
    let tagged = db.declare_with(
        "Tagged",
        TypeShape::Object(
            ObjectShape::record()
                .with_field("Id", TypeId::GUID)
                .with_field("When", TypeId::DATE)
                .with_field("Tags", db.list(TypeId::STRING)),
        ),
    );
    let config = SynthConfig::default().with_guids(GuidStrategy::Fixed);
    let synth = Synthesizer::with_config(&db, config);

    let first = synth.synthesize(tagged);
    let second = synth.synthesize(tagged);
    assert!(first.is_success());
    assert_eq!(first, second);
}

#[test]
fn test_fresh_guids_differ() {
    let db = TypeUniverse::new();
    let synth = Synthesizer::new(&db);

    let a = synth.synthesize(TypeId::GUID).value;
    let b = synth.synthesize(TypeId::GUID).value;
    assert!(matches!(a, Some(Value::Guid(_))));
    assert_ne!(a, b);
}

#[test]
fn test_self_referential_record_terminates() {
    let db = TypeUniverse::new();
    let node = db.declare("Node");
    db.define(
        node,
        TypeShape::Object(
            ObjectShape::record()
                .with_field("Value", TypeId::INT)
                .with_field("Next", node),
        ),
    );
    let synth = Synthesizer::with_config(&db, SynthConfig::default().with_max_depth(3));

    let synthesis = synth.synthesize(node);
    let mut current = synthesis.value.expect("value");
    for _ in 0..3 {
        assert_eq!(current.field("Value"), Some(&Value::Int(42)));
        current = current.field("Next").cloned().expect("member present");
    }
    // Depth 3: both members would sit at depth 4.
    assert_eq!(current.field("Value"), Some(&Value::Null));
    assert_eq!(current.field("Next"), Some(&Value::Null));

    assert_eq!(
        count_code(&synthesis.diagnostics, diagnostic_codes::BREAKING_CYCLE_AFTER_DEPTH),
        2
    );
    assert!(synthesis.diagnostics.has_warnings());
    assert!(!synthesis.diagnostics.has_errors());
}

#[test]
fn test_default_depth_bound_terminates() {
    let db = TypeUniverse::new();
    let node = db.declare("Node");
    db.define(
        node,
        TypeShape::Object(ObjectShape::record().with_field("Next", node)),
    );

    let synthesis = Synthesizer::new(&db).synthesize(node);
    let mut levels = 0;
    let mut current = synthesis.value.expect("value");
    while let Some(next) = current.field("Next").filter(|v| !v.is_null()).cloned() {
        levels += 1;
        current = next;
    }
    assert_eq!(levels, 20);
}

#[test]
fn test_reserved_property_is_skipped() {
    let db = TypeUniverse::new();
    let doc = db.declare_with(
        "Document",
        TypeShape::Object(
            ObjectShape::record()
                .with_field("Title", TypeId::STRING)
                .with_field("ExtensionData", db.map(TypeId::STRING, TypeId::TOP)),
        ),
    );

    let value = Synthesizer::new(&db).synthesize(doc).value.expect("value");
    assert_eq!(value.field("Title"), Some(&s("test")));
    assert_eq!(value.field("ExtensionData"), Some(&Value::Null));
}

#[test]
fn test_failed_field_is_left_null() {
    let db = TypeUniverse::new();
    let orphan = db.declare_with("IOrphan", TypeShape::Object(ObjectShape::interface()));
    let holder = db.declare_with(
        "Holder",
        TypeShape::Object(
            ObjectShape::record()
                .with_field("Name", TypeId::STRING)
                .with_field("Orphan", orphan),
        ),
    );

    let synthesis = Synthesizer::new(&db).synthesize(holder);
    let value = synthesis.value.expect("value");
    assert_eq!(value.field("Name"), Some(&s("test")));
    assert_eq!(value.field("Orphan"), Some(&Value::Null));
    assert!(
        synthesis
            .diagnostics
            .contains_code(diagnostic_codes::NO_IMPLEMENTATION_REGISTERED)
    );
}

#[test]
fn test_inherited_fields_are_populated() {
    let db = TypeUniverse::new();
    let base = db.declare_with(
        "Entity",
        TypeShape::Object(ObjectShape::abstract_class().with_field("Id", TypeId::INT)),
    );
    let customer = db.declare_with(
        "Customer",
        TypeShape::Object(
            ObjectShape::record()
                .with_base(base)
                .with_field("Name", TypeId::STRING),
        ),
    );

    let value = Synthesizer::new(&db).synthesize(customer).value.expect("value");
    assert_eq!(value.field("Id"), Some(&Value::Int(42)));
    assert_eq!(value.field("Name"), Some(&s("test")));
}

// =============================================================================
// Leaves and containers
// =============================================================================

#[test]
fn test_scalar_literals() {
    let db = TypeUniverse::new();
    let synth = Synthesizer::new(&db);
    let value = |id| synth.synthesize(id).value.expect("value");

    assert_eq!(value(TypeId::BOOL), Value::Bool(true));
    assert_eq!(value(TypeId::INT), Value::Int(42));
    assert_eq!(value(TypeId::DOUBLE), Value::Double(42.42));
    assert_eq!(value(TypeId::FLOAT), Value::Float(42.42));
    assert_eq!(value(TypeId::CHAR), Value::Char('t'));
    assert_eq!(value(TypeId::DECIMAL), Value::Decimal(Decimal::new(4242, 2)));
    assert_eq!(value(TypeId::STRING), s("test"));
    assert_eq!(value(TypeId::REGEX), Value::Regex("test".to_string()));
    assert_eq!(value(TypeId::COLOR), Value::Color(Rgba::from_array([1, 2, 3, 4])));
    assert_eq!(
        value(TypeId::DATE).to_json(),
        serde_json::json!("2000-01-01T00:00:00Z")
    );
    assert_eq!(ScalarKind::ALL.len(), 11);
}

#[test]
fn test_singleton_substitutes() {
    let db = TypeUniverse::new();
    let synth = Synthesizer::new(&db);
    let value = |id| synth.synthesize(id).value.expect("value");

    assert_eq!(value(TypeId::TOP), s("test"));
    assert_eq!(value(TypeId::TYPE_HANDLE), Value::TypeHandle("string".to_string()));
    assert_eq!(value(TypeId::METHOD_HANDLE), Value::MethodHandle("ToString".to_string()));
    assert_eq!(value(TypeId::COMPARABLE), Value::Int(42));
}

#[test]
fn test_enum_uses_last_member() {
    let db = TypeUniverse::new();
    let color = db.declare_enum("Color", &["Red", "Green", "Blue"]);
    let empty = db.declare_enum("Nothing", &[]);
    let synth = Synthesizer::new(&db);

    assert_eq!(
        synth.synthesize(color).value,
        Some(Value::Enum {
            type_name: "Color".to_string(),
            member: "Blue".to_string(),
            ordinal: 2,
        })
    );

    let synthesis = synth.synthesize(empty);
    assert_eq!(synthesis.value, None);
    assert!(synthesis.diagnostics.contains_code(diagnostic_codes::ENUM_HAS_NO_MEMBERS));
}

#[test]
fn test_collection_rules() {
    let db = TypeUniverse::new();
    let synth = Synthesizer::new(&db);
    let value = |id| synth.synthesize(id).value.expect("value");

    assert_eq!(
        value(db.map(TypeId::STRING, TypeId::INT)),
        Value::Map(vec![(s("test"), Value::Int(42))])
    );
    assert_eq!(value(db.list(TypeId::STRING)), Value::List(vec![s("test")]));
    assert_eq!(value(db.set(TypeId::STRING)), Value::Set(Vec::new()));
    assert_eq!(
        value(db.read_only_list(TypeId::INT)),
        Value::ReadOnlyList(vec![Value::Int(42)])
    );
    assert_eq!(value(db.array(TypeId::INT, 1)), Value::Array(vec![Value::Int(42)]));
    assert_eq!(
        value(db.array(TypeId::INT, 2)),
        Value::Array2(vec![vec![Value::Int(42)]])
    );
    assert_eq!(
        value(db.tuple(vec![TypeId::INT, TypeId::BOOL, TypeId::STRING])),
        Value::Tuple(vec![Value::Int(42), Value::Bool(true), s("test")])
    );
    assert_eq!(value(db.sequence(TypeId::INT)), Value::List(vec![Value::Int(42)]));
    assert_eq!(
        value(db.map_interface(TypeId::INT, TypeId::BOOL)),
        Value::Map(vec![(Value::Int(42), Value::Bool(true))])
    );
}

#[test]
fn test_missing_elements_follow_container_rules() {
    let db = TypeUniverse::new();
    let opaque = db.declare_with("Handle", TypeShape::Opaque);
    let synth = Synthesizer::new(&db);
    let value = |id| synth.synthesize(id).value.expect("value");

    assert_eq!(value(db.list(opaque)), Value::List(Vec::new()));
    assert_eq!(value(db.map(TypeId::STRING, opaque)), Value::Map(Vec::new()));
    assert_eq!(value(db.array(opaque, 1)), Value::Array(vec![Value::Null]));
    assert_eq!(
        value(db.tuple(vec![TypeId::INT, opaque])),
        Value::Tuple(vec![Value::Int(42), Value::Null])
    );
}

#[test]
fn test_unsupported_array_rank() {
    let db = TypeUniverse::new();
    let cube = db.array(TypeId::INT, 3);

    let synthesis = Synthesizer::new(&db).synthesize(cube);
    assert_eq!(synthesis.value, None);
    let diag = synthesis.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(diag.code, diagnostic_codes::ARRAY_RANK_NOT_SUPPORTED);
    assert_eq!(diag.message_text, "Array rank 3 of 'int[,,]' is not supported.");
}

#[test]
fn test_opaque_type_reports_unsupported() {
    let db = TypeUniverse::new();
    let pointer = db.declare_with("Pointer", TypeShape::Opaque);

    let synthesis = Synthesizer::new(&db).synthesize(pointer);
    assert_eq!(synthesis.value, None);
    assert!(synthesis.diagnostics.contains_code(diagnostic_codes::TYPE_NOT_SUPPORTED));
}

// =============================================================================
// Polymorphism and generics
// =============================================================================

fn shapes(db: &TypeUniverse) -> (TypeId, TypeId, TypeId) {
    let shape = db.declare_with("IShape", TypeShape::Object(ObjectShape::interface()));
    let circle = db.declare_with(
        "Circle",
        TypeShape::Object(
            ObjectShape::record()
                .with_interfaces(vec![shape])
                .with_field("Radius", TypeId::DOUBLE),
        ),
    );
    let square = db.declare_with(
        "Square",
        TypeShape::Object(
            ObjectShape::record()
                .with_interfaces(vec![shape])
                .with_field("Side", TypeId::INT),
        ),
    );
    (shape, circle, square)
}

#[test]
fn test_interface_resolves_to_first_registered() {
    let db = TypeUniverse::new();
    let (shape, _, _) = shapes(&db);
    let synth = Synthesizer::new(&db);

    let first = synth.synthesize(shape).value.expect("value");
    assert!(matches!(&first, Value::Record { type_name, .. } if type_name == "Circle"));
    assert_eq!(first.field("Radius"), Some(&Value::Double(42.42)));

    for _ in 0..5 {
        assert_eq!(synth.synthesize(shape).value.as_ref(), Some(&first));
    }
}

#[test]
fn test_bulk_uses_its_own_registry() {
    let db = TypeUniverse::new();
    let (shape, _, square) = shapes(&db);
    let synth = Synthesizer::new(&db);
    let epoch = synth.registry().epoch();

    let outcome = synth.synthesize_many(&[shape, square]);
    let resolved = outcome.value_of(shape).expect("resolved");
    assert!(matches!(resolved, Value::Record { type_name, .. } if type_name == "Square"));

    // The memoized registry is untouched.
    assert_eq!(synth.registry().epoch(), epoch);
    let single = synth.synthesize(shape).value.expect("value");
    assert!(matches!(single, Value::Record { type_name, .. } if type_name == "Circle"));
}

#[test]
fn test_bulk_registry_can_span_unrequested_types() {
    let db = TypeUniverse::new();
    let (shape, circle, square) = shapes(&db);
    let synth = Synthesizer::new(&db);

    let outcome = synth.synthesize_many_in(&[shape], &[square, circle, shape]);
    assert!(outcome.failures.is_empty());
    let resolved = outcome.value_of(shape).expect("resolved");
    assert!(matches!(resolved, Value::Record { type_name, .. } if type_name == "Square"));

    let narrow = synth.synthesize_many(&[shape]);
    assert_eq!(narrow.failures, vec![shape]);
}

#[test]
fn test_resolution_policy_changes_the_pick() {
    let db = TypeUniverse::new();
    let shape = db.declare_with("IShape", TypeShape::Object(ObjectShape::interface()));
    let named = db.declare_with("INamed", TypeShape::Object(ObjectShape::interface()));
    let label = db.declare_with(
        "Label",
        TypeShape::Object(ObjectShape::record().with_interfaces(vec![shape, named])),
    );
    let dot = db.declare_with(
        "Dot",
        TypeShape::Object(ObjectShape::record().with_interfaces(vec![shape])),
    );

    let first = Synthesizer::new(&db);
    assert_eq!(first.registry().lookup(&db, shape), Some(label));

    let config = SynthConfig::default().with_resolution(ResolutionPolicy::MostSpecific);
    let specific = Synthesizer::with_config(&db, config);
    assert_eq!(specific.registry().lookup(&db, shape), Some(dot));
    let value = specific.synthesize(shape).value.expect("value");
    assert!(matches!(value, Value::Record { ref type_name, .. } if type_name == "Dot"));
}

#[test]
fn test_open_generic_closes_to_int() {
    let db = TypeUniverse::new();
    let t = db.type_param("T", 0, Vec::new());
    let boxed = db.declare_with(
        "Box",
        TypeShape::Object(
            ObjectShape::record()
                .with_type_params(vec![t])
                .with_field("Value", t)
                .with_field("Items", db.list(t)),
        ),
    );

    let value = Synthesizer::new(&db).synthesize(boxed).value.expect("value");
    assert!(matches!(&value, Value::Record { type_name, .. } if type_name == "Box<int>"));
    assert_eq!(value.field("Value"), Some(&Value::Int(42)));
    assert_eq!(value.field("Items"), Some(&Value::List(vec![Value::Int(42)])));
}

#[test]
fn test_generic_interface_keeps_requested_arguments() {
    let db = TypeUniverse::new();
    let t = db.type_param("T", 0, Vec::new());
    let repo = db.declare_with(
        "IRepository",
        TypeShape::Object(ObjectShape::interface().with_type_params(vec![t])),
    );
    let u = db.type_param("U", 0, Vec::new());
    db.declare_with(
        "MemoryRepository",
        TypeShape::Object(
            ObjectShape::record()
                .with_type_params(vec![u])
                .with_interfaces(vec![db.application(repo, vec![u])])
                .with_field("Items", db.list(u)),
        ),
    );

    let requested = db.application(repo, vec![TypeId::STRING]);
    let value = Synthesizer::new(&db).synthesize(requested).value.expect("value");
    assert!(
        matches!(&value, Value::Record { type_name, .. } if type_name == "MemoryRepository<string>")
    );
    assert_eq!(value.field("Items"), Some(&Value::List(vec![s("test")])));
}

#[test]
fn test_recursive_generic_terminates() {
    let db = TypeUniverse::new();
    let t = db.type_param("T", 0, Vec::new());
    let node = db.declare("Node");
    db.define(
        node,
        TypeShape::Object(
            ObjectShape::record()
                .with_type_params(vec![t])
                .with_field("Value", t)
                .with_field("Next", db.application(node, vec![t])),
        ),
    );
    let synth = Synthesizer::with_config(&db, SynthConfig::default().with_max_depth(2));

    let synthesis = synth.synthesize(db.application(node, vec![TypeId::STRING]));
    let value = synthesis.value.expect("value");
    assert_eq!(value.field("Value"), Some(&s("test")));
    let next = value.field("Next").expect("member");
    assert_eq!(next.field("Value"), Some(&s("test")));
}

// =============================================================================
// Immutable records
// =============================================================================

fn person(db: &TypeUniverse) -> TypeId {
    db.declare_with(
        "Person",
        TypeShape::Object(
            ObjectShape::record()
                .with_readonly_field("FirstName", TypeId::STRING)
                .with_readonly_field("LastName", TypeId::STRING)
                .with_readonly_field("Age", TypeId::INT)
                .with_field("Nickname", TypeId::STRING)
                .with_constructor(vec![ParamInfo::new("firstName", TypeId::STRING)])
                .with_constructor(vec![
                    ParamInfo::new("firstName", TypeId::STRING),
                    ParamInfo::new("lastName", TypeId::STRING),
                    ParamInfo::new("age", TypeId::INT),
                ]),
        ),
    )
}

#[test]
fn test_immutable_record_uses_widest_constructor() {
    let db = TypeUniverse::new();
    let person = person(&db);

    let synthesis = Synthesizer::new(&db).synthesize(person);
    let value = synthesis.value.expect("value");
    assert_eq!(value.field("FirstName"), Some(&s("test")));
    assert_eq!(value.field("LastName"), Some(&s("test")));
    assert_eq!(value.field("Age"), Some(&Value::Int(42)));
    assert_eq!(value.field("Nickname"), Some(&s("test")));
    assert!(synthesis.diagnostics.is_empty());
}

#[test]
fn test_immutable_without_constructor() {
    let db = TypeUniverse::new();
    let frozen = db.declare_with(
        "Frozen",
        TypeShape::Object(ObjectShape::record().with_readonly_field("Id", TypeId::INT)),
    );

    let synthesis = Synthesizer::new(&db).synthesize(frozen);
    assert_eq!(synthesis.value, None);
    assert!(
        synthesis
            .diagnostics
            .contains_code(diagnostic_codes::NO_CONSTRUCTOR_DECLARED)
    );
}

#[test]
fn test_self_referential_immutable_record_terminates() {
    let db = TypeUniverse::new();
    let link = db.declare("Link");
    db.define(
        link,
        TypeShape::Object(
            ObjectShape::record()
                .with_readonly_field("Next", link)
                .with_constructor(vec![ParamInfo::new("next", link)]),
        ),
    );

    let synthesis = Synthesizer::with_config(&db, SynthConfig::default().with_max_depth(4))
        .synthesize(link);
    assert!(synthesis.is_success());
    assert_eq!(
        count_code(&synthesis.diagnostics, diagnostic_codes::BREAKING_CYCLE_AFTER_DEPTH),
        1
    );
}

/// Rejects every constructor with more than `max_arity` parameters.
struct ArityLimit {
    max_arity: usize,
}

impl Activator for ArityLimit {
    fn instantiate(&self, db: &dyn TypeProvider, type_id: TypeId) -> Result<Value, ActivationError> {
        RecordActivator.instantiate(db, type_id)
    }

    fn construct(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        ctor: &ConstructorInfo,
        args: Vec<Option<Value>>,
    ) -> Result<Value, ActivationError> {
        if ctor.arity() > self.max_arity {
            return Err(ActivationError::Rejected("too many arguments".to_string()));
        }
        RecordActivator.construct(db, type_id, ctor, args)
    }

    fn assign(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        target: &mut Value,
        field: &str,
        value: Value,
    ) -> Result<(), ActivationError> {
        RecordActivator.assign(db, type_id, target, field, value)
    }
}

#[test]
fn test_constructor_failure_without_fallback() {
    let db = TypeUniverse::new();
    let person = person(&db);
    let synth = Synthesizer::new(&db).with_activator(ArityLimit { max_arity: 1 });

    let synthesis = synth.synthesize(person);
    assert_eq!(synthesis.value, None);
    let diag = synthesis.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(diag.code, diagnostic_codes::CONSTRUCTOR_FAILED);
    assert_eq!(
        diag.message_text,
        "Constructor of 'Person' with 3 parameter(s) failed: too many arguments"
    );
}

#[test]
fn test_constructor_fallback_retries_narrower() {
    let db = TypeUniverse::new();
    let person = person(&db);
    let config = SynthConfig::default().with_constructor_fallback(true);
    let synth = Synthesizer::with_config(&db, config).with_activator(ArityLimit { max_arity: 1 });

    let synthesis = synth.synthesize(person);
    let value = synthesis.value.expect("value");
    assert_eq!(value.field("FirstName"), Some(&s("test")));
    assert_eq!(value.field("LastName"), Some(&Value::Null));
    assert_eq!(value.field("Nickname"), Some(&s("test")));

    assert!(synthesis.diagnostics.contains_code(diagnostic_codes::CONSTRUCTOR_FAILED));
    let retry = synthesis
        .diagnostics
        .iter()
        .find(|d| d.code == diagnostic_codes::RETRYING_WITH_SMALLER_CONSTRUCTOR)
        .expect("retry noted");
    assert_eq!(retry.category, DiagnosticCategory::Message);
}

// =============================================================================
// Failure boundaries
// =============================================================================

struct Panicking;

impl Activator for Panicking {
    fn instantiate(&self, _: &dyn TypeProvider, _: TypeId) -> Result<Value, ActivationError> {
        panic!("activator exploded");
    }

    fn construct(
        &self,
        _: &dyn TypeProvider,
        _: TypeId,
        _: &ConstructorInfo,
        _: Vec<Option<Value>>,
    ) -> Result<Value, ActivationError> {
        panic!("activator exploded");
    }

    fn assign(
        &self,
        _: &dyn TypeProvider,
        _: TypeId,
        _: &mut Value,
        _: &str,
        _: Value,
    ) -> Result<(), ActivationError> {
        Ok(())
    }
}

#[test]
fn test_panics_become_error_diagnostics() {
    let db = TypeUniverse::new();
    let order = order(&db);
    let synth = Synthesizer::new(&db).with_activator(Panicking);

    let synthesis = synth.synthesize(order);
    assert_eq!(synthesis.value, None);
    assert!(synthesis.diagnostics.has_errors());
    let diag = synthesis.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(diag.code, diagnostic_codes::SYNTHESIS_PANICKED);
    assert_eq!(diag.message_text, "Synthesis of 'Order' panicked: activator exploded");

    // Scalars never reach the activator.
    assert!(synth.synthesize(TypeId::INT).is_success());
}

/// Panics while instantiating `Inner`; every other call is delegated.
struct InnerPanics;

impl Activator for InnerPanics {
    fn instantiate(&self, db: &dyn TypeProvider, type_id: TypeId) -> Result<Value, ActivationError> {
        if db.name_of(type_id) == "Inner" {
            panic!("inner exploded");
        }
        RecordActivator.instantiate(db, type_id)
    }

    fn construct(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        ctor: &ConstructorInfo,
        args: Vec<Option<Value>>,
    ) -> Result<Value, ActivationError> {
        RecordActivator.construct(db, type_id, ctor, args)
    }

    fn assign(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        target: &mut Value,
        field: &str,
        value: Value,
    ) -> Result<(), ActivationError> {
        if field == "Bad" {
            panic!("assignment exploded");
        }
        RecordActivator.assign(db, type_id, target, field, value)
    }
}

#[test]
fn test_member_panic_keeps_the_owner() {
    let db = TypeUniverse::new();
    let inner = db.declare_with(
        "Inner",
        TypeShape::Object(ObjectShape::record().with_field("Value", TypeId::INT)),
    );
    let outer = db.declare_with(
        "Outer",
        TypeShape::Object(
            ObjectShape::record()
                .with_field("Name", TypeId::STRING)
                .with_field("Child", inner),
        ),
    );
    let synth = Synthesizer::new(&db).with_activator(InnerPanics);

    let synthesis = synth.synthesize(outer);
    let value = synthesis.value.expect("value");
    assert_eq!(value.field("Name"), Some(&s("test")));
    assert_eq!(value.field("Child"), Some(&Value::Null));

    assert!(!synthesis.diagnostics.has_errors());
    let diag = synthesis.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(diag.code, diagnostic_codes::MEMBER_SYNTHESIS_PANICKED);
    assert_eq!(diag.category, DiagnosticCategory::Warning);
    assert_eq!(diag.type_name.as_deref(), Some("Inner"));
    assert_eq!(diag.message_text, "Synthesis of member type 'Inner' panicked: inner exploded");
}

#[test]
fn test_panicking_assignment_skips_the_field() {
    let db = TypeUniverse::new();
    let record = db.declare_with(
        "Mixed",
        TypeShape::Object(
            ObjectShape::record()
                .with_field("Good", TypeId::STRING)
                .with_field("Bad", TypeId::INT)
                .with_field("Also", TypeId::BOOL),
        ),
    );
    let synth = Synthesizer::new(&db).with_activator(InnerPanics);

    let synthesis = synth.synthesize(record);
    let value = synthesis.value.expect("value");
    assert_eq!(value.field("Good"), Some(&s("test")));
    assert_eq!(value.field("Bad"), Some(&Value::Null));
    assert_eq!(value.field("Also"), Some(&Value::Bool(true)));
    assert!(synthesis.diagnostics.is_empty());
}

struct NoInstances;

impl Activator for NoInstances {
    fn instantiate(&self, db: &dyn TypeProvider, type_id: TypeId) -> Result<Value, ActivationError> {
        Err(ActivationError::NoDefaultConstructor {
            type_name: db.name_of(type_id),
        })
    }

    fn construct(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        ctor: &ConstructorInfo,
        args: Vec<Option<Value>>,
    ) -> Result<Value, ActivationError> {
        RecordActivator.construct(db, type_id, ctor, args)
    }

    fn assign(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        target: &mut Value,
        field: &str,
        value: Value,
    ) -> Result<(), ActivationError> {
        RecordActivator.assign(db, type_id, target, field, value)
    }
}

#[test]
fn test_instantiation_failure_is_reported() {
    let db = TypeUniverse::new();
    let order = order(&db);

    let synthesis = Synthesizer::new(&db).with_activator(NoInstances).synthesize(order);
    assert_eq!(synthesis.value, None);
    let diag = synthesis.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(diag.code, diagnostic_codes::COULD_NOT_INSTANTIATE);
    assert_eq!(diag.type_name.as_deref(), Some("Order"));
}

#[test]
fn test_bulk_partitions_successes_and_failures() {
    let db = TypeUniverse::new();
    let order = order(&db);
    let orphan = db.declare_with("IOrphan", TypeShape::Object(ObjectShape::interface()));
    let pointer = db.declare_with("Pointer", TypeShape::Opaque);
    let color = db.declare_enum("Color", &["Red", "Blue"]);
    let requested = [order, orphan, pointer, color];

    let outcome = Synthesizer::new(&db).synthesize_many(&requested);

    assert_eq!(outcome.values.len(), 2);
    assert_eq!(outcome.failures, vec![orphan, pointer]);
    assert_eq!(
        outcome.values.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
        vec![order, color]
    );
    assert_eq!(outcome.diagnostics.len(), 2);
}
