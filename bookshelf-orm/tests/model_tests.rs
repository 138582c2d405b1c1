use bookshelf_orm::prelude::*;

async fn setup_database(name: &str) -> Database {
    let database = Database::new(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("failed to init database");
    database.migrate().await.expect("failed to migrate");
    database
}

#[derive(Model, Clone, FromRow, Debug)]
struct Member {
    #[field(primary_key = true, auto = true)]
    id: Option<Integer>,
    #[field(size = 50)]
    name: String,
    #[field(default = "reader")]
    role: String,
    joined: Integer,
}

#[derive(Model, Clone, FromRow, Debug)]
struct Shelf {
    #[field(primary_key = true, auto = true)]
    id: Option<Integer>,
    #[field(unique = true, size = 20)]
    code: String,
}

fn shelf(code: &str) -> Shelf {
    Shelf {
        code: code.to_string(),
        ..Default::default()
    }
}

async fn seed(conn: &Connection) {
    for (name, joined) in [
        ("Ada", 1990),
        ("grace", 1985),
        ("Linus", 1991),
        ("Ken_T", 1969),
        ("100% Dennis", 1969),
    ] {
        let r = Member::create(kwargs!(name = name, joined = joined), conn).await;
        assert!(r.is_ok(), "{:?}", r);
    }
}

#[test]
fn schema_is_generated_from_fields() {
    assert_eq!(Member::NAME, "Member");
    assert_eq!(Member::PK, "id");
    assert_eq!(
        Member::UP,
        "create table if not exists Member (id integer primary key autoincrement, \
         name varchar(50) not null, role varchar(255) default 'reader' not null, \
         joined integer not null);"
    );
    assert_eq!(Member::DOWN, "drop table if exists Member;");

    let member = Member::default();
    assert_eq!(member.id, None);
    assert_eq!(member.role, "reader");
}

#[tokio::test]
async fn test_crud() {
    let database = setup_database("crud").await;
    let conn = &database.conn;

    // Create
    let r = Member {
        name: "Barbara".to_string(),
        joined: 1972,
        ..Default::default()
    }
    .save(conn)
    .await;
    assert!(r.is_ok(), "{:?}", r);

    // Get
    let member = Member::get(kwargs!(name = "Barbara"), conn).await.unwrap();
    let mut member = member.expect("saved member");
    assert!(member.id.is_some());
    assert_eq!(member.role, "reader");

    // Update
    member.role = "admin".to_owned();
    let r = member.update(conn).await;
    assert!(r.is_ok(), "{:?}", r);
    let updated = Member::get(kwargs!(role == "admin"), conn).await.unwrap().unwrap();
    assert_eq!(updated.name, "Barbara");

    // Set
    let r = Member::set(updated.id, kwargs!(joined = 1973), conn).await;
    assert!(r.is_ok(), "{:?}", r);
    let set = Member::get(kwargs!(joined == 1973), conn).await.unwrap();
    assert!(set.is_some());

    // Delete
    let r = updated.delete(conn).await;
    assert!(r.is_ok(), "{:?}", r);
    assert!(Member::get(kwargs!(role == "admin"), conn).await.unwrap().is_none());
    assert_eq!(Member::count(conn).await.unwrap(), 0);
}

#[tokio::test]
async fn test_queryset_filter_and_order() {
    let database = setup_database("queryset").await;
    let conn = &database.conn;
    seed(conn).await;

    let names: Vec<String> = Member::objects()
        .order_by(&["name"])
        .fetch(conn)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, ["100% Dennis", "Ada", "Ken_T", "Linus", "grace"]);

    let newest = Member::objects()
        .order_by(&["-joined", "name"])
        .first(conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(newest.name, "Linus");

    let old = Member::objects()
        .filter(kwargs!(joined < 1986))
        .filter(kwargs!(name icontains "e").or(kwargs!(name icontains "a")));
    assert_eq!(old.count(conn).await.unwrap(), 3);
}

#[tokio::test]
async fn test_icontains_is_case_insensitive_and_literal() {
    let database = setup_database("icontains").await;
    let conn = &database.conn;
    seed(conn).await;

    let found = Member::filter(kwargs!(name icontains "GRACE"), conn).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "grace");

    // `_` and `%` match themselves, not any character
    let found = Member::filter(kwargs!(name icontains "n_"), conn).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Ken_T");
    let found = Member::filter(kwargs!(name icontains "0%"), conn).await.unwrap();
    assert_eq!(found.len(), 1);
    let found = Member::filter(kwargs!(name icontains "%"), conn).await.unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_distinct_values_and_labels() {
    let database = setup_database("distinct").await;
    let conn = &database.conn;
    seed(conn).await;

    let years: Vec<i32> = Member::objects().distinct_values("joined", conn).await.unwrap();
    assert_eq!(years, [1969, 1985, 1990, 1991]);

    let labels = Member::objects().distinct_labels("joined", conn).await.unwrap();
    assert_eq!(labels, ["1969", "1985", "1990", "1991"]);

    let filtered: Vec<String> = Member::objects()
        .filter(kwargs!(joined = 1969))
        .distinct_values("name", conn)
        .await
        .unwrap();
    assert_eq!(filtered, ["100% Dennis", "Ken_T"]);
}

#[tokio::test]
async fn test_paginator() {
    let database = setup_database("paginator").await;
    let conn = &database.conn;
    seed(conn).await;

    let paginator = Paginator::new(Member::objects().order_by(&["name"]), 2);
    assert_eq!(paginator.count(conn).await.unwrap(), 5);

    let first = paginator.get_page(None, conn).await.unwrap();
    assert_eq!(first.number, 1);
    assert_eq!(first.num_pages, 3);
    assert_eq!(first.len(), 2);
    assert_eq!(first.object_list[0].name, "100% Dennis");

    let last = paginator.get_page(Some("42"), conn).await.unwrap();
    assert_eq!(last.number, 3);
    assert_eq!(last.len(), 1);
    assert_eq!(last.object_list[0].name, "grace");
    assert_eq!((last.start_index, last.end_index), (5, 5));

    let junk = paginator.get_page(Some("two"), conn).await.unwrap();
    assert_eq!(junk.number, 1);

    let strict = paginator.page(4, conn).await;
    assert!(matches!(strict, Err(PageError::OutOfRange { number: 4, num_pages: 3 })));

    let empty = Paginator::new(Member::objects().filter(kwargs!(joined > 3000)), 2);
    let page = empty.get_page(Some("3"), conn).await.unwrap();
    assert_eq!(page.number, 1);
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_reset_drops_rows() {
    let database = setup_database("reset").await;
    let conn = &database.conn;
    seed(conn).await;

    let members = Member::all(conn).await.unwrap();
    assert_eq!(members.len(), 5);

    database.reset().await.unwrap();
    assert_eq!(Member::count(conn).await.unwrap(), 0);

    seed(conn).await;
    assert_eq!(Member::count(conn).await.unwrap(), 5);
}

#[tokio::test]
async fn test_delete_removes_only_that_row() {
    let database = setup_database("delete_one").await;
    let conn = &database.conn;
    seed(conn).await;

    let ken = Member::get(kwargs!(name = "Ken_T"), conn).await.unwrap().unwrap();
    let r = ken.delete(conn).await;
    assert!(r.is_ok(), "{:?}", r);

    assert_eq!(Member::count(conn).await.unwrap(), 4);
    assert!(Member::get(kwargs!(name = "Ken_T"), conn).await.unwrap().is_none());
    assert!(Member::get(kwargs!(name = "Ada"), conn).await.unwrap().is_some());
}

#[tokio::test]
async fn test_bulk_create_is_all_or_nothing() {
    let database = setup_database("bulk_create").await;
    let conn = &database.conn;

    let r = Shelf::bulk_create(&[shelf("A1"), shelf("B2")], conn).await;
    assert!(r.is_ok(), "{:?}", r);
    assert_eq!(Shelf::count(conn).await.unwrap(), 2);

    // the duplicate `C3` fails the unique constraint, so `D4` and the
    // first `C3` are rolled back too
    let r = Shelf::bulk_create(&[shelf("C3"), shelf("D4"), shelf("C3")], conn).await;
    assert!(r.is_err());
    assert_eq!(Shelf::count(conn).await.unwrap(), 2);
    assert!(Shelf::get(kwargs!(code = "D4"), conn).await.unwrap().is_none());
}
