use super::{create_test_service, date};
use crate::core::constants::{INCOME_ADDED, INSIGHTS_GENERATED, PERSONAL_EXPENSE_ADDED};
use crate::core::errors::FairshareError;
use crate::core::models::{IncomeUpdate, NewIncome, NewPersonalExpense, PersonalExpenseUpdate};
use crate::core::reports::TransactionKind;
use crate::core::services::FairshareService;
use crate::core::signals::{Severity, SignalPolicy, SignalType};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

fn spend(amount: rust_decimal::Decimal, category: &str, on: NaiveDate) -> NewPersonalExpense {
    NewPersonalExpense {
        amount,
        category: Some(category.to_string()),
        description: None,
        date: Some(on),
    }
}

fn salary(amount: rust_decimal::Decimal, source: &str, on: NaiveDate) -> NewIncome {
    NewIncome {
        amount,
        source: source.to_string(),
        description: None,
        date: Some(on),
    }
}

#[tokio::test]
async fn test_personal_expense_defaults_category() {
    let _ = env_logger::try_init();
    let service = create_test_service();

    let expense = service
        .add_personal_expense(
            "alice",
            NewPersonalExpense {
                amount: dec!(12.50),
                category: None,
                description: Some("Coffee".to_string()),
                date: Some(date(2026, 9, 2)),
            },
        )
        .await
        .unwrap();
    assert_eq!(expense.category, "Other");
    assert_eq!(expense.user_id, "alice");

    let invalid = service
        .add_personal_expense(
            "alice",
            NewPersonalExpense {
                amount: dec!(-1),
                category: None,
                description: None,
                date: None,
            },
        )
        .await;
    assert!(matches!(invalid, Err(FairshareError::InvalidInput(_, _))));

    let logs = service.get_app_logs(None).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, PERSONAL_EXPENSE_ADDED);
}

#[tokio::test]
async fn test_insights_flag_budget_pressure() {
    let _ = env_logger::try_init();
    let budgets: HashMap<String, f64> = [("Food".to_string(), 3000.0)].into_iter().collect();
    let service = create_test_service().with_insight_settings(SignalPolicy::default(), budgets);

    service
        .add_personal_expense(
            "alice",
            NewPersonalExpense {
                amount: dec!(1500),
                category: Some("Food".to_string()),
                description: None,
                date: Some(date(2026, 9, 5)),
            },
        )
        .await
        .unwrap();
    // previous month is ignored
    service
        .add_personal_expense(
            "alice",
            NewPersonalExpense {
                amount: dec!(9000),
                category: Some("Food".to_string()),
                description: None,
                date: Some(date(2026, 8, 20)),
            },
        )
        .await
        .unwrap();

    let report = service.insights("alice", date(2026, 9, 10)).await.unwrap();
    let signals = &report.signals;
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].signal_type, SignalType::BudgetPressure);
    assert_eq!(signals[0].severity, Severity::High);
    assert_eq!(signals[0].user_id, "alice");
    assert_eq!(signals[0].category.as_deref(), Some("Food"));

    let logs = service.get_app_logs(None).await.unwrap();
    assert!(logs.iter().any(|l| l.action == INSIGHTS_GENERATED));
}

#[tokio::test]
async fn test_insights_for_user_without_spending() {
    let _ = env_logger::try_init();
    let service = create_test_service();
    let report = service.insights("nobody", date(2026, 9, 10)).await.unwrap();
    assert!(report.signals.is_empty());
    assert_eq!(report.summary.total, 0);
    assert!(report.chart_data.is_empty());
}

#[tokio::test]
async fn test_insight_report_summary_and_chart_data() {
    let _ = env_logger::try_init();
    let budgets: HashMap<String, f64> = [("Food".to_string(), 3000.0)].into_iter().collect();
    let service = create_test_service().with_insight_settings(SignalPolicy::default(), budgets);

    for day in 1..=6 {
        service.add_personal_expense("alice", spend(dec!(100), "Food", date(2026, 9, day))).await.unwrap();
    }
    service.add_personal_expense("alice", spend(dec!(500), "Food", date(2026, 9, 7))).await.unwrap();
    service.add_personal_expense("alice", spend(dec!(40), "Travel", date(2026, 9, 3))).await.unwrap();

    let report = service.insights("alice", date(2026, 9, 7)).await.unwrap();
    assert_eq!(report.user_id, "alice");
    assert_eq!(report.as_of, date(2026, 9, 7));
    assert_eq!(report.summary.total, report.signals.len());
    assert_eq!(report.summary.by_type.values().sum::<usize>(), report.signals.len());
    assert_eq!(report.summary.by_severity.values().sum::<usize>(), report.signals.len());
    assert_eq!(report.summary.by_type.get("ANOMALY"), Some(&1));
    let highs = report.signals.iter().filter(|s| s.severity == Severity::High).count();
    assert_eq!(report.summary.high_priority, highs);

    assert_eq!(report.chart_data.len(), 2);
    let food = &report.chart_data["Food"];
    assert_eq!(food.len(), 7);
    assert!(food[6].is_anomaly);
    assert_eq!(report.chart_data["Travel"].len(), 1);
}

#[tokio::test]
async fn test_personal_expense_list_edit_and_delete() {
    let _ = env_logger::try_init();
    let service = create_test_service();

    let older = service.add_personal_expense("alice", spend(dec!(10), "Food", date(2026, 9, 1))).await.unwrap();
    let newer = service.add_personal_expense("alice", spend(dec!(20), "Travel", date(2026, 9, 5))).await.unwrap();
    let bobs = service.add_personal_expense("bob", spend(dec!(30), "Food", date(2026, 9, 3))).await.unwrap();

    let listed = service.list_personal_expenses("alice", None).await.unwrap();
    assert_eq!(listed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![newer.id, older.id]);
    assert_eq!(service.list_personal_expenses("alice", Some(1)).await.unwrap().len(), 1);

    let edited = service
        .edit_personal_expense(
            "alice",
            older.id,
            PersonalExpenseUpdate {
                amount: Some(dec!(12.50)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.amount, dec!(12.50));
    assert_eq!(edited.category, "Food");
    assert_eq!(edited.date, date(2026, 9, 1));

    let foreign = service
        .edit_personal_expense("alice", bobs.id, PersonalExpenseUpdate::default())
        .await;
    assert!(matches!(foreign, Err(FairshareError::NotRecordOwner(_))));
    let missing = service
        .edit_personal_expense("alice", Uuid::new_v4(), PersonalExpenseUpdate::default())
        .await;
    assert!(matches!(missing, Err(FairshareError::RecordNotFound(_))));
    let invalid = service
        .edit_personal_expense(
            "alice",
            older.id,
            PersonalExpenseUpdate {
                amount: Some(dec!(0)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(invalid, Err(FairshareError::InvalidInput(_, _))));

    let empty = service.delete_personal_expenses("alice", &[]).await;
    assert!(matches!(empty, Err(FairshareError::InvalidInput(_, _))));

    // bob's row is listed but not owned, so it survives
    let deleted = service
        .delete_personal_expenses("alice", &[older.id, bobs.id])
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(service.list_personal_expenses("alice", None).await.unwrap().len(), 1);
    assert_eq!(service.list_personal_expenses("bob", None).await.unwrap().len(), 1);

    let gone = service
        .edit_personal_expense("alice", older.id, PersonalExpenseUpdate::default())
        .await;
    assert!(matches!(gone, Err(FairshareError::RecordNotFound(_))));
}

#[tokio::test]
async fn test_income_crud() {
    let _ = env_logger::try_init();
    let service = create_test_service();

    let pay = service.add_income("alice", salary(dec!(2500), "Salary", date(2026, 9, 1))).await.unwrap();
    let gig = service.add_income("alice", salary(dec!(300), "Freelance", date(2026, 9, 15))).await.unwrap();
    service.add_income("bob", salary(dec!(100), "Gift", date(2026, 9, 2))).await.unwrap();

    let blank = service.add_income("alice", salary(dec!(10), "  ", date(2026, 9, 2))).await;
    assert!(matches!(blank, Err(FairshareError::InvalidInput(_, _))));
    let negative = service.add_income("alice", salary(dec!(-10), "Salary", date(2026, 9, 2))).await;
    assert!(matches!(negative, Err(FairshareError::InvalidInput(_, _))));

    let listed = service.list_incomes("alice", None).await.unwrap();
    assert_eq!(listed.iter().map(|i| i.id).collect::<Vec<_>>(), vec![gig.id, pay.id]);

    let edited = service
        .edit_income(
            "alice",
            pay.id,
            IncomeUpdate {
                source: Some("Payroll".to_string()),
                description: Some("September".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.source, "Payroll");
    assert_eq!(edited.amount, dec!(2500));
    assert_eq!(edited.description.as_deref(), Some("September"));

    let foreign = service.edit_income("bob", pay.id, IncomeUpdate::default()).await;
    assert!(matches!(foreign, Err(FairshareError::NotRecordOwner(_))));

    assert_eq!(service.delete_incomes("bob", &[pay.id, gig.id]).await.unwrap(), 0);
    assert_eq!(service.delete_incomes("alice", &[gig.id]).await.unwrap(), 1);
    assert_eq!(service.list_incomes("alice", None).await.unwrap().len(), 1);

    let logs = service.get_app_logs(Some("alice")).await.unwrap();
    assert_eq!(logs.iter().filter(|l| l.action == INCOME_ADDED).count(), 2);
}

#[tokio::test]
async fn test_monthly_breakdown_groups_by_month() {
    let _ = env_logger::try_init();
    let service = create_test_service();

    service.add_personal_expense("alice", spend(dec!(100), "Food", date(2026, 9, 2))).await.unwrap();
    service.add_personal_expense("alice", spend(dec!(50.25), "Food", date(2026, 9, 20))).await.unwrap();
    service.add_personal_expense("alice", spend(dec!(80), "Hobbies", date(2026, 9, 21))).await.unwrap();
    service.add_personal_expense("alice", spend(dec!(700), "Travel", date(2026, 8, 14))).await.unwrap();

    let months = service.monthly_breakdown("alice").await.unwrap();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].month, "August 2026");
    assert_eq!(months[1].month, "September 2026");
    assert_eq!(months[1].month_number, 9);

    let september = &months[1];
    assert_eq!(september.categories["Food"], dec!(150.25));
    assert_eq!(september.categories["Hobbies"], dec!(80));
    assert_eq!(september.categories["Travel"], dec!(0));
    assert_eq!(september.categories["Rent_utilities"], dec!(0));
    assert_eq!(september.total, dec!(230.25));
    assert_eq!(months[0].total, dec!(700));

    assert!(service.monthly_breakdown("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_personal_stats_for_month() {
    let _ = env_logger::try_init();
    let service = create_test_service().with_monthly_budget(dec!(1000));

    service.add_personal_expense("alice", spend(dec!(200), "Food", date(2026, 9, 2))).await.unwrap();
    service.add_personal_expense("alice", spend(dec!(50), "Food", date(2026, 9, 10))).await.unwrap();
    service.add_personal_expense("alice", spend(dec!(1000), "Travel", date(2026, 8, 10))).await.unwrap();
    service.add_income("alice", salary(dec!(2500), "Salary", date(2026, 9, 1))).await.unwrap();
    service.add_income("alice", salary(dec!(100), "Salary", date(2026, 9, 12))).await.unwrap();

    let stats = service.personal_stats("alice", 2026, 9).await.unwrap();
    assert_eq!(stats.total_income, dec!(2600));
    assert_eq!(stats.total_expenses, dec!(250));
    assert_eq!(stats.income_by_source["Salary"], dec!(2600));
    assert_eq!(stats.spending_by_category["Food"].total, dec!(250));
    assert_eq!(stats.spending_by_category["Food"].count, 2);
    assert!(!stats.spending_by_category.contains_key("Travel"));

    assert_eq!(stats.recent_transactions.len(), 4);
    assert_eq!(stats.recent_transactions[0].kind, TransactionKind::Income);
    assert_eq!(stats.recent_transactions[0].date, date(2026, 9, 12));
    assert_eq!(stats.recent_transactions[3].date, date(2026, 9, 1));

    assert_eq!(stats.budget.limit, dec!(1000));
    assert_eq!(stats.budget.remaining, dec!(750));
    assert_eq!(stats.budget.progress, 25.0);

    let bad_month = service.personal_stats("alice", 2026, 13).await;
    assert!(matches!(bad_month, Err(FairshareError::InvalidInput(_, _))));
}

#[tokio::test]
async fn test_app_log_is_bounded_and_filterable() {
    let _ = env_logger::try_init();
    let logging = InMemoryLogging::with_capacity(3);
    assert_eq!(logging.capacity(), 3);

    for i in 0..5 {
        let user = if i % 2 == 0 { "alice" } else { "bob" };
        logging.log_action("TEST", json!({ "seq": i }), Some(user)).await.unwrap();
    }
    let logs = logging.get_logs().await.unwrap();
    let seqs: Vec<i64> = logs.iter().map(|l| l.details["seq"].as_i64().unwrap()).collect();
    assert_eq!(seqs, vec![2, 3, 4]);

    let bobs = logging.get_user_logs("bob").await.unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].details["seq"], 3);

    let service = FairshareService::new(InMemoryStorage::new(), InMemoryLogging::with_capacity(2));
    for day in 1..=3 {
        service.add_personal_expense("carol", spend(dec!(5), "Food", date(2026, 9, day))).await.unwrap();
    }
    service.add_income("dan", salary(dec!(5), "Gift", date(2026, 9, 1))).await.unwrap();
    assert_eq!(service.get_app_logs(None).await.unwrap().len(), 2);
    assert_eq!(service.get_app_logs(Some("carol")).await.unwrap().len(), 1);
    assert!(service.get_app_logs(Some("erin")).await.unwrap().is_empty());
}
