mod common;

use anyhow::Result;
use common::{date, input, test_service, StandardLedger};
use spendbook::application::{AppError, TransactionFilter, TransactionInput};
use spendbook::domain::{Transaction, TransactionKind, MAX_AMOUNT_CENTS};
use spendbook::storage::{LedgerStore, StoreError};

#[test]
fn test_missing_ledger_is_empty() -> Result<()> {
    let (service, _temp) = test_service()?;

    assert!(service.load_transactions()?.is_empty());
    let balance = service.get_balance()?;
    assert_eq!(balance.net, 0);
    assert_eq!(balance.transaction_count, 0);
    assert!(!service.ledger_path().exists());

    Ok(())
}

#[test]
fn test_init_creates_ledger_once() -> Result<()> {
    let (service, _temp) = test_service()?;

    assert!(service.init()?);
    assert!(!service.init()?);
    assert!(service.ledger_path().exists());
    assert!(service.load_transactions()?.is_empty());

    Ok(())
}

#[test]
fn test_append_then_load_preserves_count_and_order() -> Result<()> {
    let (_service, temp) = test_service()?;
    let store = LedgerStore::new(temp.path().join("ordered.csv"));

    // Deliberately out of date order: the ledger keeps insertion order
    let transactions: Vec<Transaction> = (0..25)
        .map(|i| {
            let day = date("2025-06-01") - chrono::Duration::days(i);
            if i % 3 == 0 {
                Transaction::income(day, "Salary", 1000 + i)
            } else {
                Transaction::expense(day, format!("Category {}", i % 4), 50 + i)
                    .with_note(format!("note #{}, with comma", i))
            }
        })
        .collect();

    for txn in &transactions {
        store.append(txn)?;
    }

    let loaded = store.load_all()?;
    assert_eq!(loaded.len(), transactions.len());
    assert_eq!(loaded, transactions);

    Ok(())
}

#[test]
fn test_record_income_and_expense() -> Result<()> {
    let (service, _temp) = test_service()?;

    let income = service.record(TransactionInput {
        kind: TransactionKind::Income,
        amount: "£100".into(),
        date: Some("05/11/2025".into()),
        category: Some("salary".into()),
        note: Some("November".into()),
    })?;
    assert_eq!(income.amount_cents, 10000);
    assert_eq!(income.date, date("2025-11-05"));
    assert_eq!(income.note.as_deref(), Some("November"));

    let expense = service.record(input(TransactionKind::Expense, "30", "2025-11-06", "food"))?;
    assert_eq!(expense.kind, TransactionKind::Expense);

    let loaded = service.load_transactions()?;
    assert_eq!(loaded, vec![income, expense]);

    Ok(())
}

#[test]
fn test_record_defaults_category_and_date() -> Result<()> {
    let (service, _temp) = test_service()?;

    let txn = service.record(TransactionInput {
        kind: TransactionKind::Expense,
        amount: "4.20".into(),
        date: None,
        category: None,
        note: None,
    })?;

    assert_eq!(txn.category, "Other");
    assert_eq!(txn.date, chrono::Local::now().date_naive());

    Ok(())
}

#[test]
fn test_record_rejects_invalid_input() -> Result<()> {
    let (service, _temp) = test_service()?;

    let bad_amount = service.record(input(TransactionKind::Expense, "ten", "2025-01-01", "Food"));
    assert!(matches!(bad_amount, Err(AppError::InvalidAmount(_))));

    let negative = service.record(input(TransactionKind::Expense, "-5", "2025-01-01", "Food"));
    assert!(matches!(negative, Err(AppError::InvalidAmount(_))));

    let zero = service.record(input(TransactionKind::Expense, "0", "2025-01-01", "Food"));
    assert!(matches!(zero, Err(AppError::InvalidAmount(_))));

    let bad_date = service.record(input(TransactionKind::Income, "5", "2025-13-01", "Salary"));
    assert!(matches!(bad_date, Err(AppError::InvalidDate(_))));

    // Nothing was written
    assert!(service.load_transactions()?.is_empty());
    assert!(!service.ledger_path().exists());

    Ok(())
}

#[test]
fn test_malformed_row_surfaces_as_store_error() -> Result<()> {
    let (service, _temp) = test_service()?;
    StandardLedger::populate(&service)?;

    // Corrupt the ledger by hand
    let mut contents = std::fs::read_to_string(service.ledger_path())?;
    contents.push_str("04/04/2025,Rent,nine hundred,expense,\n");
    std::fs::write(service.ledger_path(), contents)?;

    match service.get_balance() {
        Err(AppError::Store(StoreError::MalformedRow { line, .. })) => assert_eq!(line, 13),
        other => panic!("expected malformed row error, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_list_transactions_with_filter_and_limit() -> Result<()> {
    let (service, _temp) = test_service()?;
    StandardLedger::populate(&service)?;

    let rent = service.list_transactions(
        &TransactionFilter {
            category: Some("rent".into()),
            ..Default::default()
        },
        None,
    )?;
    assert_eq!(rent.len(), 3);
    assert!(rent.iter().all(|t| t.category == "Rent"));

    let february = service.list_transactions(
        &TransactionFilter {
            from_date: Some(date("2025-02-01")),
            to_date: Some(date("2025-02-28")),
            ..Default::default()
        },
        None,
    )?;
    assert_eq!(february.len(), 4);

    let income = service.list_transactions(
        &TransactionFilter {
            kind: Some(TransactionKind::Income),
            ..Default::default()
        },
        None,
    )?;
    assert_eq!(income.len(), 3);

    // Limit keeps the most recent entries
    let last_two = service.list_transactions(&TransactionFilter::default(), Some(2))?;
    assert_eq!(last_two.len(), 2);
    assert_eq!(last_two[0].date, date("2025-03-03"));
    assert_eq!(last_two[1].date, date("2025-03-20"));

    let all = service.list_transactions(&TransactionFilter::default(), Some(100))?;
    assert_eq!(all.len(), 11);

    Ok(())
}

#[test]
fn test_duplicate_entries_are_kept() -> Result<()> {
    let (service, _temp) = test_service()?;

    for _ in 0..2 {
        service.record(input(TransactionKind::Expense, "3.50", "2025-05-05", "Coffee"))?;
    }

    let loaded = service.load_transactions()?;
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0], loaded[1]);
    assert_eq!(service.get_balance()?.net, -700);

    Ok(())
}

#[test]
fn test_oversized_amounts_are_rejected() -> Result<()> {
    let (service, _temp) = test_service()?;

    for _ in 0..2 {
        let huge = service.record(input(TransactionKind::Expense, "90000000000000000", "2025-01-01", "Rent"));
        assert!(matches!(huge, Err(AppError::InvalidAmount(_))));
    }

    let built = Transaction::expense(date("2025-01-01"), "Rent", MAX_AMOUNT_CENTS + 1);
    assert!(matches!(
        service.record_transaction(&built),
        Err(AppError::InvalidAmount(_))
    ));
    assert!(service.load_transactions()?.is_empty());

    // The largest accepted amounts still add up without overflow
    for _ in 0..3 {
        service.record(input(TransactionKind::Expense, "10000000000", "2025-01-01", "Rent"))?;
    }
    let balance = service.get_balance()?;
    assert_eq!(balance.total_expense, 3 * MAX_AMOUNT_CENTS);
    assert_eq!(balance.net, -3 * MAX_AMOUNT_CENTS);

    Ok(())
}

#[test]
fn test_oversized_amount_in_ledger_file_is_malformed() -> Result<()> {
    let (service, _temp) = test_service()?;
    std::fs::write(
        service.ledger_path(),
        "date,category,amount,type,note\n\
         01/01/2025,Rent,90000000000000000,expense,\n\
         02/01/2025,Rent,90000000000000000,expense,\n",
    )?;

    match service.get_balance() {
        Err(AppError::Store(StoreError::MalformedRow { line, .. })) => assert_eq!(line, 2),
        other => panic!("expected malformed row error, got {:?}", other),
    }

    Ok(())
}
