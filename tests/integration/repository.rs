use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use gurumi_server::models::internal::EmotionScores;
use gurumi_server::storage::entities::{lemons, report, report_summary};
use gurumi_server::storage::{
    ChatRepository, LemonRepository, NewReport, ReportRepository, RepositoryError, UserRepository,
};

use super::{create_test_user, test_env, TestEnv, INITIAL_LEMONS};

fn scores() -> EmotionScores {
    EmotionScores {
        comfortable: 2,
        happy: 5,
        sad: 1,
        joyful: 4,
        annoyed: 0,
        lethargic: 0,
    }
}

/// Conversation on `date` plus a report with the given tags and total score.
async fn make_report(
    env: &TestEnv,
    user_id: Uuid,
    date: NaiveDate,
    keywords: &[&str],
    sentiment: i32,
) -> gurumi_server::models::internal::Report {
    let (conversation, _) = env
        .chat_repo
        .find_or_create_conversation(user_id, date)
        .await
        .unwrap();

    env.report_repo
        .create_report(NewReport {
            conversation_id: conversation.id,
            user_id,
            summary: format!("{date}의 하루 요약"),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            sentiment,
            scores: scores(),
        })
        .await
        .unwrap()
}

async fn set_report_created_at(db: &DatabaseConnection, report_id: Uuid, at: NaiveDateTime) {
    report::Entity::update_many()
        .col_expr(report::Column::CreatedAt, Expr::value(at))
        .filter(report::Column::Id.eq(report_id.to_string()))
        .exec(db)
        .await
        .unwrap();
}

async fn set_lemon_count(db: &DatabaseConnection, user_id: Uuid, count: i32) {
    lemons::Entity::update_many()
        .col_expr(lemons::Column::LemonCount, Expr::value(count))
        .filter(lemons::Column::UserId.eq(user_id.to_string()))
        .exec(db)
        .await
        .unwrap();
}

fn day(offset: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(offset)
}

#[tokio::test]
async fn create_report_persists_linked_entities_and_spends_a_lemon() {
    let env = test_env("http://llm.invalid").await;
    let user_id = create_test_user(&env).await;

    let created = make_report(&env, user_id, day(0), &["여행", "바다"], 72).await;
    assert!(created.snowflake_id > 0);

    let view = env
        .report_repo
        .find_by_conversation_id(created.conversation_id)
        .await
        .unwrap()
        .expect("report should exist");

    assert_eq!(view.report.id, created.id);
    assert_eq!(view.tags, vec!["여행", "바다"]);
    assert_eq!(view.emotion.total_score, 72);
    assert_eq!(view.emotion.happy_score, 5);
    assert!(view.summary.contents.contains("하루 요약"));
    assert!(view.drawing_diary.is_none());

    let lemon = env.lemon_repo.find_by_user(user_id).await.unwrap();
    assert_eq!(lemon.lemon_count, INITIAL_LEMONS - 1);
}

#[tokio::test]
async fn second_report_for_same_conversation_is_rejected() {
    let env = test_env("http://llm.invalid").await;
    let user_id = create_test_user(&env).await;

    let created = make_report(&env, user_id, day(0), &["하루"], 50).await;

    let err = env
        .report_repo
        .create_report(NewReport {
            conversation_id: created.conversation_id,
            user_id,
            summary: "두 번째 시도".to_string(),
            keywords: vec!["중복".to_string()],
            sentiment: 10,
            scores: scores(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Duplicate(_)));

    let rows = report::Entity::find().count(&env.db).await.unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn exhausted_balance_rolls_back_every_write() {
    let env = test_env("http://llm.invalid").await;
    let user_id = create_test_user(&env).await;
    set_lemon_count(&env.db, user_id, 0).await;

    let (conversation, _) = env
        .chat_repo
        .find_or_create_conversation(user_id, day(0))
        .await
        .unwrap();

    let err = env
        .report_repo
        .create_report(NewReport {
            conversation_id: conversation.id,
            user_id,
            summary: "기록되면 안 되는 요약".to_string(),
            keywords: vec!["없음".to_string()],
            sentiment: 1,
            scores: scores(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Exhausted(_)));

    assert_eq!(report::Entity::find().count(&env.db).await.unwrap(), 0);
    assert_eq!(
        report_summary::Entity::find().count(&env.db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn search_matches_any_token_against_tag_lists() {
    let env = test_env("http://llm.invalid").await;
    let user_id = create_test_user(&env).await;

    let travel = make_report(&env, user_id, day(3), &["여행", "바다"], 60).await;
    let food = make_report(&env, user_id, day(2), &["음식"], 55).await;
    let _study = make_report(&env, user_id, day(1), &["공부"], 40).await;

    let tokens = vec!["여행".to_string(), "음식".to_string()];
    let items = env.report_repo.search(&tokens, 20, None).await.unwrap();

    let ids: Vec<Uuid> = items.iter().map(|i| i.report_id).collect();
    assert_eq!(ids.len(), 2, "OR semantics should match both reports");
    assert!(ids.contains(&travel.id));
    assert!(ids.contains(&food.id));

    // Newest first.
    assert!(items[0].snowflake_id > items[1].snowflake_id);
}

#[tokio::test]
async fn search_is_exact_element_match_not_substring() {
    let env = test_env("http://llm.invalid").await;
    let user_id = create_test_user(&env).await;

    make_report(&env, user_id, day(1), &["여행지"], 60).await;

    let tokens = vec!["여행".to_string()];
    let items = env.report_repo.search(&tokens, 20, None).await.unwrap();
    assert!(items.is_empty(), "'여행' must not match the tag '여행지'");
}

#[tokio::test]
async fn search_pages_continue_strictly_below_the_cursor() {
    let env = test_env("http://llm.invalid").await;
    let user_id = create_test_user(&env).await;

    for offset in 1..=5 {
        make_report(&env, user_id, day(offset), &["일상"], 50).await;
    }

    let tokens = vec!["일상".to_string()];
    let first = env.report_repo.search(&tokens, 2, None).await.unwrap();
    assert_eq!(first.len(), 2);
    let cursor = first.last().unwrap().snowflake_id;

    let second = env
        .report_repo
        .search(&tokens, 2, Some(cursor))
        .await
        .unwrap();
    assert_eq!(second.len(), 2);
    for item in &second {
        assert!(item.snowflake_id < cursor);
        assert!(!first.iter().any(|f| f.report_id == item.report_id));
    }
}

#[tokio::test]
async fn monthly_listing_respects_month_boundaries() {
    let env = test_env("http://llm.invalid").await;
    let user_id = create_test_user(&env).await;

    let in_may_1 = make_report(&env, user_id, day(4), &["오월"], 50).await;
    let in_may_2 = make_report(&env, user_id, day(3), &["오월"], 50).await;
    let in_june = make_report(&env, user_id, day(2), &["유월"], 50).await;

    let mk = |y: i32, m: u32, d: u32, h: u32| {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    };
    set_report_created_at(&env.db, in_may_1.id, mk(2025, 5, 1, 0)).await;
    set_report_created_at(&env.db, in_may_2.id, mk(2025, 5, 31, 23)).await;
    set_report_created_at(&env.db, in_june.id, mk(2025, 6, 1, 0)).await;

    let may = env
        .report_repo
        .list_monthly(2025, 5, 20, None)
        .await
        .unwrap();
    let ids: Vec<Uuid> = may.iter().map(|i| i.report_id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&in_may_1.id));
    assert!(ids.contains(&in_may_2.id));

    let june = env
        .report_repo
        .list_monthly(2025, 6, 20, None)
        .await
        .unwrap();
    assert_eq!(june.len(), 1);
    assert_eq!(june[0].report_id, in_june.id);
}

#[tokio::test]
async fn monthly_listing_rejects_invalid_month() {
    let env = test_env("http://llm.invalid").await;

    let err = env
        .report_repo
        .list_monthly(2025, 13, 20, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidInput(_)));
}

#[tokio::test]
async fn weekly_scores_cover_the_trailing_seven_days_ascending() {
    let env = test_env("http://llm.invalid").await;
    let user_id = create_test_user(&env).await;
    let target = Utc::now().date_naive();

    let noon = |d: NaiveDate| d.and_hms_opt(12, 0, 0).unwrap();
    let oldest = make_report(&env, user_id, target - Duration::days(6), &["a"], 10).await;
    let middle = make_report(&env, user_id, target - Duration::days(3), &["b"], 20).await;
    let newest = make_report(&env, user_id, target, &["c"], 30).await;
    set_report_created_at(&env.db, oldest.id, noon(target - Duration::days(6))).await;
    set_report_created_at(&env.db, middle.id, noon(target - Duration::days(3))).await;
    set_report_created_at(&env.db, newest.id, noon(target)).await;

    // Outside the window, and from another user: both invisible.
    let out_of_window = make_report(&env, user_id, target - Duration::days(8), &["d"], 99).await;
    set_report_created_at(&env.db, out_of_window.id, noon(target - Duration::days(8))).await;
    let other_user = create_test_user(&env).await;
    make_report(&env, other_user, target, &["e"], 77).await;

    let scores = env
        .report_repo
        .weekly_scores(user_id, target)
        .await
        .unwrap();

    let values: Vec<i32> = scores.iter().map(|s| s.score).collect();
    assert_eq!(values, vec![10, 20, 30]);
    for pair in scores.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
    }
}

#[tokio::test]
async fn deactivating_a_user_hides_their_reports() {
    let env = test_env("http://llm.invalid").await;
    let user_id = create_test_user(&env).await;

    let created = make_report(&env, user_id, day(1), &["일상"], 50).await;
    env.users.deactivate(user_id).await.unwrap();

    let found = env
        .report_repo
        .find_by_conversation_id(created.conversation_id)
        .await
        .unwrap();
    assert!(found.is_none());

    let tokens = vec!["일상".to_string()];
    let items = env.report_repo.search(&tokens, 20, None).await.unwrap();
    assert!(items.is_empty());

    assert!(env.users.find_by_id(user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn attach_drawing_diary_requires_an_existing_report() {
    let env = test_env("http://llm.invalid").await;

    let err = env
        .report_repo
        .attach_drawing_diary(Uuid::new_v4(), "https://cdn/img.png", "구름 그림")
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[tokio::test]
async fn attach_drawing_diary_links_the_illustration() {
    let env = test_env("http://llm.invalid").await;
    let user_id = create_test_user(&env).await;
    let created = make_report(&env, user_id, day(0), &["그림"], 50).await;

    let diary = env
        .report_repo
        .attach_drawing_diary(created.conversation_id, "https://cdn/img.png", "구름 그림")
        .await
        .unwrap();
    assert_eq!(diary.image_url, "https://cdn/img.png");

    let view = env
        .report_repo
        .find_by_conversation_id(created.conversation_id)
        .await
        .unwrap()
        .unwrap();
    let attached = view.drawing_diary.expect("illustration should be linked");
    assert_eq!(attached.id, diary.id);
    assert_eq!(attached.image_title, "구름 그림");
}

#[tokio::test]
async fn list_items_carry_summary_tags_and_thumbnail() {
    let env = test_env("http://llm.invalid").await;
    let user_id = create_test_user(&env).await;

    let created = make_report(&env, user_id, day(0), &["바다"], 64).await;
    env.report_repo
        .attach_drawing_diary(created.conversation_id, "https://cdn/thumb.png", "썸네일")
        .await
        .unwrap();

    let tokens = vec!["바다".to_string()];
    let items = env.report_repo.search(&tokens, 20, None).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].conversation_id, created.conversation_id);
    assert_eq!(items[0].tags, vec!["바다"]);
    assert!(items[0].ai_summary.contains("하루 요약"));
    assert_eq!(items[0].thumbnail.as_deref(), Some("https://cdn/thumb.png"));
}
