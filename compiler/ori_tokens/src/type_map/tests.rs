use super::*;
use pretty_assertions::assert_eq;

fn base() -> TypeMap<String> {
    let mut builder = TypeMap::new().builder();
    builder.type_id(&"ident".to_owned());
    builder.type_id(&"keyword".to_owned());
    builder.build()
}

#[test]
fn test_ids_are_dense_and_stable() {
    let mut builder = TypeMap::<&str>::new().builder();

    assert_eq!(builder.type_id(&"ident"), 0);
    assert_eq!(builder.type_id(&"string"), 1);
    assert_eq!(builder.type_id(&"ident"), 0);
    assert_eq!(builder.type_id(&"comment"), 2);

    let map = builder.build();
    assert_eq!(map.len(), 3);
    assert_eq!(*map.get(1), "string");
    assert_eq!(map.id_of(&"comment"), Some(2));
    assert_eq!(map.id_of(&"number"), None);
}

#[test]
fn test_lookup_does_not_copy() {
    let map = base();
    let mut builder = map.builder();

    assert_eq!(builder.type_id(&"keyword".to_owned()), 1);
    assert!(!builder.mapping_copied());

    assert_eq!(builder.type_id(&"string".to_owned()), 2);
    assert!(builder.mapping_copied());

    assert_eq!(builder.type_id(&"number".to_owned()), 3);
    assert!(builder.mapping_copied());
}

#[test]
fn test_builder_does_not_leak_into_snapshot() {
    let map = base();
    let mut builder = map.builder();
    builder.type_id(&"string".to_owned());
    let derived = builder.build();

    assert_eq!(map.len(), 2);
    assert_eq!(map.id_of(&"string".to_owned()), None);
    assert_eq!(derived.len(), 3);
    assert_eq!(derived.get(0), "ident");
    assert_eq!(derived.get(2), "string");
}

#[test]
fn test_sibling_builders_are_isolated() {
    let map = base();
    let mut first = map.builder();
    let mut second = map.builder();

    assert_eq!(first.type_id(&"string".to_owned()), 2);
    assert_eq!(second.len(), 2);
    assert!(!second.mapping_copied());
    assert_eq!(second.type_id(&"comment".to_owned()), 2);

    let first = first.build();
    let second = second.build();
    assert_eq!(first.get(2), "string");
    assert_eq!(second.get(2), "comment");
    assert_eq!(map.len(), 2);
}

#[test]
fn test_snapshot_can_seed_further_builders() {
    let mut builder = base().builder();
    builder.type_id(&"string".to_owned());
    let derived = builder.build();

    let mut next = derived.builder();
    assert_eq!(next.type_id(&"string".to_owned()), 2);
    assert_eq!(next.type_id(&"number".to_owned()), 3);
    assert_eq!(derived.len(), 3);
}

#[test]
fn test_unknown_id() {
    let map = base();

    assert_eq!(
        map.try_get(7),
        Err(TypeMapError::UnknownId { id: 7, len: 2 })
    );
}

#[test]
#[should_panic(expected = "type id 2 is not registered")]
fn test_get_unknown_id_panics() {
    let _ = base().get(2);
}

#[test]
fn test_clone_shares_snapshot() {
    let map = base();
    let copy = map.clone();

    assert_eq!(copy.get(1), "keyword");
    assert!(TypeMap::<u8>::default().is_empty());
}
