//! Tests for codecs of self-referential and mutually recursive types.

use serde_json::json;
use shapecodec::{
    derive_decoder, derive_encoder, CodecCache, Configuration, Decoder, Encoder, ShapeMismatch,
    Shaped, TypeRef, TypeShape, Variant,
};

#[derive(Debug, Clone, PartialEq)]
struct Node {
    label: String,
    children: Vec<Node>,
}

impl Shaped for Node {
    fn shape() -> TypeShape<Self> {
        TypeShape::<Self>::record()
            .field("label", |n| &n.label)
            .field("children", |n| &n.children)
            .build(|fields| {
                Ok(Node {
                    label: fields.take()?,
                    children: fields.take()?,
                })
            })
    }
}

fn leaf(label: &str) -> Node {
    Node {
        label: label.to_string(),
        children: Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Category {
    name: String,
    parent: Option<Box<Category>>,
}

impl Shaped for Category {
    fn shape() -> TypeShape<Self> {
        TypeShape::<Self>::record()
            .field("name", |c| &c.name)
            .field("parent", |c| &c.parent)
            .build(|fields| {
                Ok(Category {
                    name: fields.take()?,
                    parent: fields.take()?,
                })
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Num(i32),
    Add(Box<Expr>, Box<Expr>),
    Scope(Block),
}

#[derive(Debug, Clone, PartialEq)]
struct Block {
    statements: Vec<Expr>,
    result: Option<Box<Expr>>,
}

impl Shaped for Expr {
    fn shape() -> TypeShape<Self> {
        TypeShape::<Self>::union()
            .case("Num", &[TypeRef::of::<i32>()])
            .case("Add", &[TypeRef::of::<Box<Expr>>(), TypeRef::of::<Box<Expr>>()])
            .case("Scope", &[TypeRef::of::<Block>()])
            .build(
                |expr| match expr {
                    Expr::Num(n) => Variant::new(0).arg(n),
                    Expr::Add(left, right) => Variant::new(1).arg(left).arg(right),
                    Expr::Scope(block) => Variant::new(2).arg(block),
                },
                |case, args| match case {
                    0 => Ok(Expr::Num(args.take()?)),
                    1 => Ok(Expr::Add(args.take()?, args.take()?)),
                    2 => Ok(Expr::Scope(args.take()?)),
                    other => Err(ShapeMismatch::UnknownCase(other)),
                },
            )
    }
}

impl Shaped for Block {
    fn shape() -> TypeShape<Self> {
        TypeShape::<Self>::record()
            .field("statements", |b| &b.statements)
            .field("result", |b| &b.result)
            .build(|fields| {
                Ok(Block {
                    statements: fields.take()?,
                    result: fields.take()?,
                })
            })
    }
}

fn codecs<T: Shaped>() -> (Encoder<T>, Decoder<T>) {
    let config = Configuration::new();
    (
        derive_encoder(&config).unwrap(),
        derive_decoder(&config).unwrap(),
    )
}

#[test]
fn test_tree_round_trip() {
    let (encoder, decoder) = codecs::<Node>();
    let tree = Node {
        label: "root".to_string(),
        children: vec![
            Node {
                label: "a".to_string(),
                children: vec![leaf("a1"), leaf("a2")],
            },
            leaf("b"),
        ],
    };

    let encoded = encoder.encode(&tree);
    assert_eq!(
        encoded,
        json!({
            "Label": "root",
            "Children": [
                {"Label": "a", "Children": [
                    {"Label": "a1", "Children": []},
                    {"Label": "a2", "Children": []}
                ]},
                {"Label": "b", "Children": []}
            ]
        })
    );
    assert_eq!(decoder.decode(&encoded).unwrap(), tree);
}

#[test]
fn test_tree_error_path_crosses_recursion() {
    let (_, decoder) = codecs::<Node>();
    let error = decoder
        .decode(&json!({
            "Label": "root",
            "Children": [
                {"Label": "a", "Children": [
                    {"Label": "a1", "Children": []},
                    {"Label": 2, "Children": []}
                ]}
            ]
        }))
        .unwrap_err();
    assert_eq!(error.path.to_string(), ".Children.[0].Children.[1].Label");
}

#[test]
fn test_deep_tree() {
    let (encoder, decoder) = codecs::<Node>();
    let mut tree = leaf("bottom");
    for depth in 0..200 {
        tree = Node {
            label: depth.to_string(),
            children: vec![tree],
        };
    }
    assert_eq!(decoder.decode(&encoder.encode(&tree)).unwrap(), tree);
}

#[test]
fn test_optional_boxed_parent_chain() {
    let (encoder, decoder) = codecs::<Category>();
    let shoes = Category {
        name: "shoes".to_string(),
        parent: Some(Box::new(Category {
            name: "clothing".to_string(),
            parent: None,
        })),
    };

    let encoded = encoder.encode(&shoes);
    assert_eq!(
        encoded,
        json!({"Name": "shoes", "Parent": {"Name": "clothing"}})
    );
    assert_eq!(decoder.decode(&encoded).unwrap(), shoes);
}

#[test]
fn test_mutually_recursive_types() {
    let (encoder, decoder) = codecs::<Expr>();
    let expr = Expr::Add(
        Box::new(Expr::Num(1)),
        Box::new(Expr::Scope(Block {
            statements: vec![Expr::Num(2)],
            result: Some(Box::new(Expr::Add(
                Box::new(Expr::Num(3)),
                Box::new(Expr::Num(4)),
            ))),
        })),
    );

    let encoded = encoder.encode(&expr);
    assert_eq!(
        encoded,
        json!([
            "Add",
            ["Num", 1],
            ["Scope", {
                "Statements": [["Num", 2]],
                "Result": ["Add", ["Num", 3], ["Num", 4]]
            }]
        ])
    );
    assert_eq!(decoder.decode(&encoded).unwrap(), expr);

    let error = decoder
        .decode(&json!(["Scope", {"Statements": [["Num", "x"]]}]))
        .unwrap_err();
    assert_eq!(error.path.to_string(), ".[1].Statements.[0].[1]");
}

#[test]
fn test_recursive_members_are_cached() {
    let cache: CodecCache = CodecCache::new();
    let config = Configuration::new();

    let encoder = cache.encoder::<Expr>(&config).unwrap();
    assert!(cache.contains_encoder::<Block>(&config));
    assert!(cache.contains_encoder::<Vec<Expr>>(&config));
    assert!(cache.contains_encoder::<Box<Expr>>(&config));

    // a member fetched from the cache still reaches the whole graph
    let block_encoder = cache.encoder::<Block>(&config).unwrap();
    let block = Block {
        statements: vec![Expr::Scope(Block {
            statements: Vec::new(),
            result: Some(Box::new(Expr::Num(9))),
        })],
        result: None,
    };
    assert_eq!(
        block_encoder.encode(&block),
        json!({"Statements": [["Scope", {"Statements": [], "Result": ["Num", 9]}]]})
    );
    assert_eq!(encoder.encode(&Expr::Num(5)), json!(["Num", 5]));
}
