//! Command-language round trips: parse + dispatch against a live store.

use docbase::prelude::*;
use serde_json::{Value, json};

fn store() -> DocumentStore<MemoryEngine> {
    DocumentStore::new(MemoryEngine::new())
}

async fn run(store: &DocumentStore<MemoryEngine>, line: &str) -> DocBaseResult<Value> {
    command::execute(store, line).await
}

#[tokio::test]
async fn collection_commands_manage_the_registry() {
    let store = store();

    assert_eq!(
        run(&store, r#"collection.create({collectionName: "users"})"#)
            .await
            .unwrap(),
        Value::Null
    );
    assert_eq!(
        run(&store, r#"collection.create({collectionName: "orders"});"#)
            .await
            .unwrap(),
        Value::Null
    );
    assert_eq!(
        run(&store, "collection.listCollection()").await.unwrap(),
        json!(["orders", "users"])
    );

    assert!(matches!(
        run(&store, r#"collection.create({collectionName: "users"})"#).await,
        Err(DocBaseError::AlreadyExists(_))
    ));
    // A missing collectionName argument fails name validation.
    assert!(matches!(
        run(&store, "collection.create({})").await,
        Err(DocBaseError::Validation(_))
    ));

    assert_eq!(
        run(&store, r#"collection.delete({collectionName: "orders"})"#)
            .await
            .unwrap(),
        Value::Null
    );
    assert_eq!(
        run(&store, "collection.listCollection()").await.unwrap(),
        json!(["users"])
    );
}

#[tokio::test]
async fn document_commands_cover_the_crud_cycle() {
    let store = store();
    run(&store, r#"collection.create({collectionName: "users"})"#)
        .await
        .unwrap();

    let created = run(&store, r#"users.createOne({name: "Ann", age: 5})"#)
        .await
        .unwrap();
    assert_eq!(created["name"], json!("Ann"));
    assert_eq!(created["age"], json!(5));
    assert!(created["id"].as_str().is_some());
    assert!(created["createdAt"].as_str().is_some());

    let found = run(&store, r#"users.findOne({name: "Ann"})"#).await.unwrap();
    assert_eq!(found, created);
    assert_eq!(
        run(&store, r#"users.findOne({name: "Zed"})"#).await.unwrap(),
        Value::Null
    );

    let updated = run(&store, r#"users.updateOne({name: "Ann"}, {name: "Annie"})"#)
        .await
        .unwrap();
    assert_eq!(updated, json!(true));
    let annie = run(&store, r#"users.findOne({name: "Annie"})"#)
        .await
        .unwrap();
    assert_eq!(annie["id"], created["id"]);

    assert_eq!(
        run(&store, r#"users.deleteOne({name: "Annie"})"#)
            .await
            .unwrap(),
        json!(true)
    );
    assert_eq!(
        run(&store, r#"users.deleteOne({name: "Annie"})"#)
            .await
            .unwrap(),
        json!(false)
    );
}

#[tokio::test]
async fn find_command_supports_queries_options_and_projection() {
    let store = store();
    run(&store, r#"collection.create({collectionName: "users"})"#)
        .await
        .unwrap();
    for line in [
        r#"users.createOne({name: "Ann", age: 5})"#,
        r#"users.createOne({name: "Bob", age: 5})"#,
        r#"users.createOne({name: "Cleo", age: 9})"#,
    ] {
        run(&store, line).await.unwrap();
    }

    let everyone = run(&store, "users.find({})").await.unwrap();
    assert_eq!(everyone.as_array().unwrap().len(), 3);

    let fives = run(&store, "users.find({query: {age: 5}})").await.unwrap();
    assert_eq!(fives.as_array().unwrap().len(), 2);

    let projected = run(
        &store,
        r#"users.find({query: {age: 5}, options: {returnFields: ["name"], limit: 1}})"#,
    )
    .await
    .unwrap();
    let projected = projected.as_array().unwrap();
    assert_eq!(projected.len(), 1);
    assert_eq!(projected[0].as_object().unwrap().len(), 1);
    assert!(projected[0]["name"].is_string());

    // Timestamps inside query strings survive the bare-key rewrite.
    let ranged = run(
        &store,
        r#"users.find({query: {createdAt: {gte: "2000-01-01T00:00:00.000Z"}}})"#,
    )
    .await
    .unwrap();
    assert_eq!(ranged.as_array().unwrap().len(), 3);

    assert!(matches!(
        run(&store, "users.find({options: {limit: 0}})").await,
        Err(DocBaseError::Validation(_))
    ));
}

#[tokio::test]
async fn truncate_command_keeps_the_collection() {
    let store = store();
    run(&store, r#"collection.create({collectionName: "users"})"#)
        .await
        .unwrap();
    run(&store, r#"users.createOne({name: "Ann"})"#).await.unwrap();

    assert_eq!(
        run(&store, r#"collection.truncate({collectionName: "users"})"#)
            .await
            .unwrap(),
        Value::Null
    );
    assert_eq!(
        run(&store, "collection.listCollection()").await.unwrap(),
        json!(["users"])
    );
    assert_eq!(run(&store, "users.find({})").await.unwrap(), json!([]));
}

#[tokio::test]
async fn unknown_and_malformed_commands_are_rejected() {
    let store = store();
    run(&store, r#"collection.create({collectionName: "users"})"#)
        .await
        .unwrap();

    assert!(matches!(
        run(&store, "users.explode({})").await,
        Err(DocBaseError::UnknownCommand(_))
    ));
    assert!(matches!(
        run(&store, "users.createOne(").await,
        Err(DocBaseError::Parse(_))
    ));
    assert!(matches!(
        run(&store, r#"users.updateOne({name: "Ann"})"#).await,
        Err(DocBaseError::Parse(_))
    ));
    assert!(matches!(
        run(&store, r#"ghosts.findOne({name: "Ann"})"#).await,
        Err(DocBaseError::NotFound(_))
    ));
}
