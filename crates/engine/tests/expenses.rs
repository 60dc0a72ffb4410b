use chrono::NaiveDate;
use engine::{Engine, EngineError, ExpensePatch, Money};
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    for (id, email) in [("u1", "u1@x.com"), ("u2", "u2@x.com"), ("u3", "u3@x.com")] {
        engine.ensure_profile(id, email, None).await.unwrap();
    }
    (engine, db)
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn shared_expense_flow_keeps_totals_consistent() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.new_group("Trip", "", "u1").await.unwrap();
    engine
        .invite_member(&group.id, "u2@x.com", "u1")
        .await
        .unwrap();

    let expense = engine
        .add_expense(
            &group.id,
            "Taxi",
            Money::new(40),
            "Transport",
            date("2024-01-01"),
            "u2",
        )
        .await
        .unwrap();
    assert_eq!(expense.user_id, "u2");

    let totals = engine.group_totals(&group.id, "u1").await.unwrap();
    assert_eq!(totals.group_total, Money::new(40));
    let u2 = totals.members.iter().find(|m| m.user_id == "u2").unwrap();
    assert_eq!(u2.total, Money::new(40));
    let u1 = totals.members.iter().find(|m| m.user_id == "u1").unwrap();
    assert_eq!(u1.total, Money::ZERO);

    // The owner raises the amount.
    engine
        .update_expense(
            &expense.id,
            ExpensePatch {
                amount: Some(Money::new(60)),
                ..Default::default()
            },
            "u2",
        )
        .await
        .unwrap();
    let totals = engine.group_totals(&group.id, "u2").await.unwrap();
    assert_eq!(totals.group_total, Money::new(60));

    // The group admin is not the owner: deletion is refused and the totals
    // stay put.
    let err = engine.delete_expense(&expense.id, "u1").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Forbidden("only the expense owner may modify it".to_string())
    );
    let totals = engine.group_totals(&group.id, "u1").await.unwrap();
    assert_eq!(totals.group_total, Money::new(60));

    // The owner deletes: group and payer totals drop by the full amount.
    engine.delete_expense(&expense.id, "u2").await.unwrap();
    let totals = engine.group_totals(&group.id, "u1").await.unwrap();
    assert_eq!(totals.group_total, Money::ZERO);
    let u2 = totals.members.iter().find(|m| m.user_id == "u2").unwrap();
    assert_eq!(u2.total, Money::ZERO);
}

#[tokio::test]
async fn add_expense_requires_membership() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.new_group("Trip", "", "u1").await.unwrap();

    let err = engine
        .add_expense(&group.id, "Taxi", Money::new(40), "", date("2024-01-01"), "u3")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .add_expense("no-such-group", "Taxi", Money::new(40), "", date("2024-01-01"), "u1")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("group not found".to_string()));
}

#[tokio::test]
async fn add_expense_rejects_negative_amount() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.new_group("Trip", "", "u1").await.unwrap();

    let err = engine
        .add_expense(&group.id, "Refund?", Money::new(-1), "", date("2024-01-01"), "u1")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("amount must not be negative".to_string())
    );
    assert!(engine.list_expenses(&group.id, "u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn update_leaves_unspecified_fields_unchanged() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.new_group("Trip", "", "u1").await.unwrap();
    let expense = engine
        .add_expense(
            &group.id,
            "Dinner",
            Money::new(1200),
            "Food",
            date("2024-03-05"),
            "u1",
        )
        .await
        .unwrap();

    let updated = engine
        .update_expense(
            &expense.id,
            ExpensePatch {
                amount: Some(Money::new(1500)),
                ..Default::default()
            },
            "u1",
        )
        .await
        .unwrap();

    assert_eq!(updated.amount, Money::new(1500));
    assert_eq!(updated.description, "Dinner");
    assert_eq!(updated.category, "Food");
    assert_eq!(updated.date, date("2024-03-05"));
    assert_eq!(updated.group_id, group.id);
    assert_eq!(updated.user_id, "u1");

    // An all-empty patch is a no-op, not an error.
    let unchanged = engine
        .update_expense(&expense.id, ExpensePatch::default(), "u1")
        .await
        .unwrap();
    assert_eq!(unchanged, updated);
}

#[tokio::test]
async fn update_validates_amount_and_ownership() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.new_group("Trip", "", "u1").await.unwrap();
    engine
        .invite_member(&group.id, "u2@x.com", "u1")
        .await
        .unwrap();
    let expense = engine
        .add_expense(&group.id, "Taxi", Money::new(40), "", date("2024-01-01"), "u2")
        .await
        .unwrap();

    let err = engine
        .update_expense(
            &expense.id,
            ExpensePatch {
                amount: Some(Money::new(-5)),
                ..Default::default()
            },
            "u2",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .update_expense(
            &expense.id,
            ExpensePatch {
                description: Some("Hijacked".to_string()),
                ..Default::default()
            },
            "u1",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .update_expense("no-such-expense", ExpensePatch::default(), "u1")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("expense not found".to_string()));
}

#[tokio::test]
async fn list_expenses_ordered_by_date_then_id() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.new_group("Trip", "", "u1").await.unwrap();

    engine
        .add_expense(&group.id, "Later", Money::new(10), "", date("2024-02-01"), "u1")
        .await
        .unwrap();
    engine
        .add_expense(&group.id, "Early A", Money::new(20), "", date("2024-01-01"), "u1")
        .await
        .unwrap();
    engine
        .add_expense(&group.id, "Early B", Money::new(30), "", date("2024-01-01"), "u1")
        .await
        .unwrap();

    let expenses = engine.list_expenses(&group.id, "u1").await.unwrap();
    assert_eq!(expenses.len(), 3);
    assert_eq!(expenses[0].date, date("2024-01-01"));
    assert_eq!(expenses[1].date, date("2024-01-01"));
    assert_eq!(expenses[2].date, date("2024-02-01"));
    // Same-date rows tie-break on id.
    assert!(expenses[0].id < expenses[1].id);
}

#[tokio::test]
async fn totals_count_unusable_rows_as_zero() {
    let (engine, db) = engine_with_db().await;
    let group = engine.new_group("Trip", "", "u1").await.unwrap();
    engine
        .add_expense(&group.id, "Taxi", Money::new(40), "", date("2024-01-01"), "u1")
        .await
        .unwrap();

    // A corrupted row written behind the engine's back must not break the
    // aggregate.
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO expenses (id, group_id, user_id, description, amount_minor, category, date) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        vec![
            "bad-row".into(),
            group.id.clone().into(),
            "u1".into(),
            "corrupt".into(),
            (-500i64).into(),
            "".into(),
            "2024-01-02".into(),
        ],
    ))
    .await
    .unwrap();

    let totals = engine.group_totals(&group.id, "u1").await.unwrap();
    assert_eq!(totals.group_total, Money::new(40));
}

#[tokio::test]
async fn expenses_of_removed_members_still_count() {
    let (engine, _db) = engine_with_db().await;
    let group = engine.new_group("Trip", "", "u1").await.unwrap();
    engine
        .invite_member(&group.id, "u2@x.com", "u1")
        .await
        .unwrap();
    engine
        .add_expense(&group.id, "Taxi", Money::new(40), "", date("2024-01-01"), "u2")
        .await
        .unwrap();

    engine.remove_member(&group.id, "u2", "u1").await.unwrap();

    // Ownership is checked at creation only; the ledger keeps the row and the
    // totals keep attributing it to the departed payer.
    let totals = engine.group_totals(&group.id, "u1").await.unwrap();
    assert_eq!(totals.group_total, Money::new(40));
    let u2 = totals.members.iter().find(|m| m.user_id == "u2").unwrap();
    assert_eq!(u2.total, Money::new(40));
}
