use super::*;

#[test]
fn test_node_new() {
    let node = Node::new(10_u32);
    assert_eq!(node.color, Color::Red);
    assert_eq!((node.left, node.right, node.parent), (NIL, NIL, NIL));
}

#[test]
fn test_sentinel() {
    let mut arena: Arena<u32> = Arena::new();
    assert_eq!(arena.color(NIL), Color::Black);
    assert_eq!(arena.left(NIL), NIL);
    assert_eq!(arena.right(NIL), NIL);
    assert_eq!(arena.parent(NIL), NIL);

    arena.set_color(NIL, Color::Black);
    assert!(arena.is_black(NIL));

    let id = arena.alloc(1);
    arena.set_parent(NIL, id);
    assert_eq!(arena.parent(NIL), id);
    assert_eq!(arena.parent(id), NIL);
}

#[test]
#[should_panic]
fn test_sentinel_red() {
    let mut arena: Arena<u32> = Arena::new();
    arena.set_color(NIL, Color::Red);
}

#[test]
fn test_arena_reuse() {
    let mut arena: Arena<String> = Arena::new();
    let a = arena.alloc("a".to_string());
    let b = arena.alloc("b".to_string());
    assert_ne!(a, b);
    assert_eq!(arena.n_slots(), 2);

    assert_eq!(arena.release(a), "a".to_string());
    assert_eq!(arena.n_free(), 1);

    let c = arena.alloc("c".to_string());
    assert_eq!(c, a);
    assert_eq!(arena.key(c), "c");
    assert_eq!(arena.color(c), Color::Red);
    assert_eq!(arena.n_slots(), 2);
    assert_eq!(arena.n_free(), 0);
}

#[test]
#[should_panic]
fn test_arena_double_release() {
    let mut arena: Arena<u32> = Arena::new();
    let a = arena.alloc(1);
    arena.release(a);
    arena.release(a);
}

#[test]
fn test_color_display() {
    assert_eq!(Color::Red.to_string(), "RED");
    assert_eq!(Color::Black.to_string(), "BLACK");
}
