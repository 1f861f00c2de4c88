mod utils;

use chrono::NaiveDate;
use finance_repo::category_repo::{CategoryRepoError, NewCategory};
use finance_repo::kind::Kind;
use finance_repo::transaction_repo::Filter;
use rstest::rstest;
use utils::generator::generate_new_transaction;
use utils::RepoType;

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_create_and_get_category(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = utils::create_test_user(&repos).await;

    let category = utils::create_category(&repos, &user, "Salary", Kind::Income).await;
    assert_eq!(category.name, "Salary");
    assert_eq!(category.kind, Kind::Income);
    assert_eq!(category.owner_id, user.id);

    let stored = repos
        .category_repo
        .get_category(user.id, category.id)
        .await
        .unwrap();
    assert_eq!(stored, category);
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_list_categories_by_kind(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = utils::create_test_user(&repos).await;

    let salary = utils::create_category(&repos, &user, "Salary", Kind::Income).await;
    let food = utils::create_category(&repos, &user, "Food", Kind::Expense).await;
    let rent = utils::create_category(&repos, &user, "Rent", Kind::Expense).await;

    let all = repos
        .category_repo
        .get_all_categories(user.id, None)
        .await
        .unwrap();
    assert_eq!(all, vec![salary.clone(), food.clone(), rent.clone()]);

    let expenses = repos
        .category_repo
        .get_all_categories(user.id, Some(Kind::Expense))
        .await
        .unwrap();
    assert_eq!(expenses, vec![food, rent]);

    let income = repos
        .category_repo
        .get_all_categories(user.id, Some(Kind::Income))
        .await
        .unwrap();
    assert_eq!(income, vec![salary]);
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_categories_are_per_user(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = utils::create_test_user(&repos).await;
    let other_user = utils::create_test_user(&repos).await;

    let category = utils::create_category(&repos, &user, "Food", Kind::Expense).await;

    let result = repos
        .category_repo
        .get_category(other_user.id, category.id)
        .await;
    assert!(matches!(result, Err(CategoryRepoError::CategoryNotFound(_))));

    let others = repos
        .category_repo
        .get_all_categories(other_user.id, None)
        .await
        .unwrap();
    assert!(others.is_empty());

    let result = repos
        .category_repo
        .delete_category(other_user.id, category.id)
        .await;
    assert!(matches!(result, Err(CategoryRepoError::CategoryNotFound(_))));
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_update_category(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = utils::create_test_user(&repos).await;

    let category = utils::create_category(&repos, &user, "Food", Kind::Expense).await;

    let updated = repos
        .category_repo
        .update_category(
            user.id,
            category.id,
            NewCategory::new("Groceries".to_owned(), Kind::Income),
        )
        .await
        .unwrap();
    assert_eq!(updated.id, category.id);
    assert_eq!(updated.name, "Groceries");
    assert_eq!(updated.kind, Kind::Income);

    let stored = repos
        .category_repo
        .get_category(user.id, category.id)
        .await
        .unwrap();
    assert_eq!(stored, updated);
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_update_missing_category(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = utils::create_test_user(&repos).await;

    let result = repos
        .category_repo
        .update_category(user.id, 9999, NewCategory::new("x".to_owned(), Kind::Income))
        .await;
    assert!(matches!(result, Err(CategoryRepoError::CategoryNotFound(9999))));
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_rename_referenced_category(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = utils::create_test_user(&repos).await;

    let category = utils::create_category(&repos, &user, "Food", Kind::Expense).await;
    let transaction = repos
        .transaction_repo
        .create_new_transaction(user.id, generate_new_transaction(&category))
        .await
        .unwrap();

    repos
        .category_repo
        .update_category(
            user.id,
            category.id,
            NewCategory::new("Eating out".to_owned(), Kind::Expense),
        )
        .await
        .unwrap();

    let stored = repos
        .transaction_repo
        .get_transaction(user.id, transaction.id)
        .await
        .unwrap();
    assert_eq!(stored.category_name.as_deref(), Some("Eating out"));

    let result = repos
        .category_repo
        .update_category(
            user.id,
            category.id,
            NewCategory::new("Eating out".to_owned(), Kind::Income),
        )
        .await;
    assert!(matches!(result, Err(CategoryRepoError::CategoryInUse(_))));
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_delete_category(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = utils::create_test_user(&repos).await;

    let category = utils::create_category(&repos, &user, "Food", Kind::Expense).await;
    repos
        .category_repo
        .delete_category(user.id, category.id)
        .await
        .unwrap();

    let result = repos.category_repo.get_category(user.id, category.id).await;
    assert!(matches!(result, Err(CategoryRepoError::CategoryNotFound(_))));

    let result = repos
        .category_repo
        .delete_category(user.id, category.id)
        .await;
    assert!(matches!(result, Err(CategoryRepoError::CategoryNotFound(_))));
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_delete_referenced_category(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = utils::create_test_user(&repos).await;

    let category = utils::create_category(&repos, &user, "Food", Kind::Expense).await;
    let transaction = repos
        .transaction_repo
        .create_new_transaction(
            user.id,
            utils::generator::generate_new_transaction_with_date(
                &category,
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ),
        )
        .await
        .unwrap();

    let result = repos
        .category_repo
        .delete_category(user.id, category.id)
        .await;
    assert!(matches!(result, Err(CategoryRepoError::CategoryInUse(_))));

    // Nothing was removed.
    repos
        .category_repo
        .get_category(user.id, category.id)
        .await
        .unwrap();
    let transactions = repos
        .transaction_repo
        .get_all_transactions(user.id, Filter::NONE, None)
        .await
        .unwrap();
    assert_eq!(transactions, vec![transaction.clone()]);

    repos
        .transaction_repo
        .delete_transaction(user.id, transaction.id)
        .await
        .unwrap();
    repos
        .category_repo
        .delete_category(user.id, category.id)
        .await
        .unwrap();
}
