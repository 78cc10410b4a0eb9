use super::*;
use crate::types::ParamInfo;
use crate::universe::TypeUniverse;

#[test]
fn test_scalars_and_singletons() {
    let db = TypeUniverse::new();

    assert_eq!(classify_type(&db, TypeId::INT), TypeKind::Scalar(ScalarKind::Int));
    assert_eq!(
        classify_type(&db, TypeId::COLOR),
        TypeKind::Scalar(ScalarKind::Color)
    );
    assert_eq!(
        classify_type(&db, TypeId::TOP),
        TypeKind::Singleton(SingletonKind::TopType)
    );
    assert_eq!(
        classify_type(&db, TypeId::STRING),
        TypeKind::Scalar(ScalarKind::String)
    );
    assert_eq!(classify_type(&db, TypeId(9999)), TypeKind::Unsupported);
}

#[test]
fn test_containers() {
    let db = TypeUniverse::new();

    let map = db.map(TypeId::STRING, TypeId::INT);
    assert_eq!(
        classify_type(&db, map),
        TypeKind::Map {
            key: TypeId::STRING,
            value: TypeId::INT
        }
    );
    assert_eq!(
        classify_type(&db, db.array(TypeId::INT, 2)),
        TypeKind::Array {
            element: TypeId::INT,
            rank: 2
        }
    );
    assert_eq!(
        classify_type(&db, db.read_only_list(TypeId::INT)),
        TypeKind::ReadOnlyList {
            element: TypeId::INT
        }
    );
    assert_eq!(
        classify_type(&db, db.sequence(TypeId::INT)),
        TypeKind::OpenGenericContainer(ContainerInterface::Sequence {
            element: TypeId::INT
        })
    );
    assert_eq!(
        classify_type(&db, db.set(TypeId::INT)),
        TypeKind::Set {
            element: TypeId::INT
        }
    );
}

#[test]
fn test_open_types() {
    let db = TypeUniverse::new();
    let t = db.type_param("T", 0, Vec::new());

    assert_eq!(classify_type(&db, t), TypeKind::OpenGeneric);
    assert_eq!(classify_type(&db, db.list(t)), TypeKind::OpenGeneric);

    let boxed = db.declare_with(
        "Box",
        TypeShape::Object(ObjectShape::record().with_type_params(vec![t]).with_field("Value", t)),
    );
    assert_eq!(classify_type(&db, boxed), TypeKind::OpenGeneric);
    assert_eq!(
        classify_type(&db, db.application(boxed, vec![TypeId::INT])),
        TypeKind::Application {
            origin: boxed,
            args: vec![TypeId::INT]
        }
    );
    assert_eq!(
        classify_type(&db, db.application(boxed, vec![t])),
        TypeKind::OpenGeneric
    );
}

#[test]
fn test_interfaces_and_abstract_classes() {
    let db = TypeUniverse::new();
    let iface = db.declare_with("IShape", TypeShape::Object(ObjectShape::interface()));
    let abs = db.declare_with("ShapeBase", TypeShape::Object(ObjectShape::abstract_class()));

    assert_eq!(classify_type(&db, iface), TypeKind::Interface);
    assert_eq!(classify_type(&db, abs), TypeKind::Interface);
}

#[test]
fn test_mutable_and_immutable_records() {
    let db = TypeUniverse::new();

    let mutable = db.declare_with(
        "Order",
        TypeShape::Object(ObjectShape::record().with_field("Name", TypeId::STRING)),
    );
    assert_eq!(classify_type(&db, mutable), TypeKind::MutableRecord);

    let read_only = db.declare_with(
        "Point",
        TypeShape::Object(
            ObjectShape::record()
                .with_readonly_field("X", TypeId::INT)
                .with_readonly_field("Y", TypeId::INT)
                .with_constructor(vec![ParamInfo::new("x", TypeId::INT), ParamInfo::new("y", TypeId::INT)]),
        ),
    );
    assert_eq!(classify_type(&db, read_only), TypeKind::ImmutableRecord);

    let no_default_ctor = db.declare_with(
        "Money",
        TypeShape::Object(
            ObjectShape::record()
                .with_field("Amount", TypeId::DECIMAL)
                .with_constructor(vec![ParamInfo::new("amount", TypeId::DECIMAL)]),
        ),
    );
    assert_eq!(classify_type(&db, no_default_ctor), TypeKind::ImmutableRecord);

    let empty = db.declare_with("Marker", TypeShape::Object(ObjectShape::record()));
    assert_eq!(classify_type(&db, empty), TypeKind::MutableRecord);
}

#[test]
fn test_inherited_writable_field_makes_record_mutable() {
    let db = TypeUniverse::new();
    let base = db.declare_with(
        "Base",
        TypeShape::Object(ObjectShape::abstract_class().with_field("Note", TypeId::STRING)),
    );
    let derived = db.declare_with(
        "Derived",
        TypeShape::Object(
            ObjectShape::record()
                .with_base(base)
                .with_readonly_field("Id", TypeId::INT),
        ),
    );

    assert_eq!(classify_type(&db, derived), TypeKind::MutableRecord);
}

#[test]
fn test_opaque_is_unsupported() {
    let db = TypeUniverse::new();
    let pointer = db.declare_with("Pointer", TypeShape::Opaque);

    assert_eq!(classify_type(&db, pointer), TypeKind::Unsupported);
    assert_eq!(classify_type(&db, pointer).label(), "unsupported");
}
