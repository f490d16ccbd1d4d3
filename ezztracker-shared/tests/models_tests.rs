/// Integration tests for the model layer against an in-memory database

use ezztracker_shared::auth::password::{hash_password, verify_password};
use ezztracker_shared::db::listing::{fetch_page, ListQuery, ListSpec};
use ezztracker_shared::db::migrations::run_migrations;
use ezztracker_shared::db::pool::create_memory_pool;
use ezztracker_shared::models::company::{Company, CreateCompany};
use ezztracker_shared::models::os::{CreateOs, Os};
use ezztracker_shared::models::priority::{CreatePriority, Priority};
use ezztracker_shared::models::product::{CreateProduct, Product};
use ezztracker_shared::models::role::{CreateRole, Role, UserRole};
use ezztracker_shared::models::status::{CreateStatus, Status};
use ezztracker_shared::models::track::{CreateTrack, Track};
use ezztracker_shared::models::track_handler::{CreateTrackHandler, TrackHandler};
use ezztracker_shared::models::user::{CreateUser, UpdateUser, User};
use sqlx::SqlitePool;

async fn setup() -> SqlitePool {
    let pool = create_memory_pool().await.expect("memory pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}

async fn role(pool: &SqlitePool, name: &str) -> Role {
    Role::create(
        pool,
        CreateRole {
            name: name.to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
}

fn new_user(email: &str, hash: &str) -> CreateUser {
    CreateUser {
        first_name: Some("Amelia".to_string()),
        last_name: Some("Smith".to_string()),
        email: email.to_string(),
        password_hash: hash.to_string(),
        active: true,
        ..Default::default()
    }
}

/// Priority, status, company, OS, product and requester for a track
struct TrackRefs {
    priority: Priority,
    status: Status,
    product: Product,
    requester: User,
}

async fn track_refs(pool: &SqlitePool) -> TrackRefs {
    let company = Company::create(
        pool,
        CreateCompany {
            company_name: "ebizz".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let os = Os::create(
        pool,
        CreateOs {
            name: "Linux".to_string(),
            initials: Some("LNX".to_string()),
            version: Some("6".to_string()),
        },
    )
    .await
    .unwrap();
    let product = Product::create(
        pool,
        CreateProduct {
            name: "Tracker".to_string(),
            initials: Some("TRK".to_string()),
            version: Some("1.0".to_string()),
            company_id: company.id,
            os_id: os.id,
        },
    )
    .await
    .unwrap();
    let priority = Priority::create(pool, CreatePriority { name: "High".to_string() })
        .await
        .unwrap();
    let status = Status::create(pool, CreateStatus { name: "Open".to_string() })
        .await
        .unwrap();
    let requester = User::create(pool, new_user("amelia.smith@example.com", "x"))
        .await
        .unwrap();

    TrackRefs {
        priority,
        status,
        product,
        requester,
    }
}

fn new_track(refs: &TrackRefs, title: &str) -> CreateTrack {
    CreateTrack {
        title: title.to_string(),
        priority_id: refs.priority.id,
        product_id: refs.product.id,
        requester_id: refs.requester.id,
        status_id: refs.status.id,
        description: None,
    }
}

#[tokio::test]
async fn test_user_create_with_roles() {
    let pool = setup().await;
    let user_role = role(&pool, "user").await;
    let super_role = role(&pool, "superuser").await;

    let mut data = new_user("amelia.smith@example.com", "hash");
    data.role_ids = vec![user_role.id, super_role.id];
    let user = User::create(&pool, data).await.unwrap();

    let loaded = User::find_by_id(&pool, user.id)
        .await
        .unwrap()
        .unwrap()
        .load_roles(&pool)
        .await
        .unwrap();
    assert_eq!(loaded.roles, vec!["superuser".to_string(), "user".to_string()]);

    let memberships = Role::memberships(&pool, user.id).await.unwrap();
    assert_eq!(
        memberships,
        vec![
            UserRole { user_id: user.id, role_id: user_role.id },
            UserRole { user_id: user.id, role_id: super_role.id },
        ]
    );
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let pool = setup().await;

    User::create(&pool, new_user("dup@example.com", "a")).await.unwrap();
    let err = User::create(&pool, new_user("dup@example.com", "b"))
        .await
        .expect_err("duplicate email must fail");

    let db_err = err.as_database_error().expect("database error");
    assert!(db_err.is_unique_violation());
    assert_eq!(User::count(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_user_create_with_unknown_role_leaves_no_user() {
    let pool = setup().await;

    let mut data = new_user("ghost@example.com", "hash");
    data.role_ids = vec![999];
    assert!(User::create(&pool, data).await.is_err());

    assert!(User::find_by_email(&pool, "ghost@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_user_update_keeps_hash_when_absent() {
    let pool = setup().await;
    let hash = hash_password("original-pass").unwrap();
    let user = User::create(&pool, new_user("jack.jones@example.com", &hash)).await.unwrap();

    let updated = User::update(
        &pool,
        user.id,
        UpdateUser {
            first_name: Some("Jackie".to_string()),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            active: false,
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("user exists");

    assert_eq!(updated.first_name.as_deref(), Some("Jackie"));
    assert!(!updated.active);
    assert_eq!(updated.password_hash, hash);
    assert!(verify_password("original-pass", &updated.password_hash).unwrap());
}

#[tokio::test]
async fn test_user_update_replaces_hash_and_roles() {
    let pool = setup().await;
    let user_role = role(&pool, "user").await;
    let super_role = role(&pool, "superuser").await;

    let mut data = new_user("mia.thomas@example.com", "old");
    data.role_ids = vec![super_role.id];
    let user = User::create(&pool, data).await.unwrap();

    let updated = User::update(
        &pool,
        user.id,
        UpdateUser {
            email: user.email.clone(),
            active: true,
            password_hash: Some("new".to_string()),
            role_ids: Some(vec![user_role.id]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.password_hash, "new");
    assert_eq!(Role::names_for_user(&pool, user.id).await.unwrap(), vec!["user".to_string()]);
}

#[tokio::test]
async fn test_user_update_missing() {
    let pool = setup().await;

    let result = User::update(
        &pool,
        42,
        UpdateUser {
            email: "nobody@example.com".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_user_delete_drops_memberships() {
    let pool = setup().await;
    let user_role = role(&pool, "user").await;

    let mut data = new_user("ava.clarke@example.com", "x");
    data.role_ids = vec![user_role.id];
    let user = User::create(&pool, data).await.unwrap();

    assert!(User::delete(&pool, user.id).await.unwrap());
    assert!(!User::delete(&pool, user.id).await.unwrap());
    assert!(Role::memberships(&pool, user.id).await.unwrap().is_empty());
    assert!(Role::find_by_id(&pool, user_role.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_set_roles() {
    let pool = setup().await;
    let user_role = role(&pool, "user").await;
    let super_role = role(&pool, "superuser").await;
    let user = User::create(&pool, new_user("isla.james@example.com", "x")).await.unwrap();

    User::set_roles(&pool, user.id, &[user_role.id, super_role.id, user_role.id])
        .await
        .unwrap();
    assert_eq!(Role::memberships(&pool, user.id).await.unwrap().len(), 2);

    User::set_roles(&pool, user.id, &[]).await.unwrap();
    assert!(Role::names_for_user(&pool, user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_role_name_unique() {
    let pool = setup().await;
    role(&pool, "user").await;

    let err = Role::create(
        &pool,
        CreateRole {
            name: "user".to_string(),
            description: Some("again".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert!(err.as_database_error().unwrap().is_unique_violation());
}

#[tokio::test]
async fn test_track_lifecycle() {
    let pool = setup().await;
    let refs = track_refs(&pool).await;

    let track = Track::create(&pool, new_track(&refs, "Crash on login")).await.unwrap();
    assert_eq!(track.to_string(), format!("#{} - Crash on login", track.id));
    assert_eq!(track.requester_id, Some(refs.requester.id));

    let mut edit = new_track(&refs, "Crash on login page");
    edit.description = Some("Steps attached".to_string());
    let updated = Track::update(&pool, track.id, edit).await.unwrap().unwrap();
    assert_eq!(updated.title.as_deref(), Some("Crash on login page"));
    assert_eq!(updated.description.as_deref(), Some("Steps attached"));

    let mine = Track::list_by_requester(&pool, refs.requester.id).await.unwrap();
    assert_eq!(mine.len(), 1);

    assert!(Track::delete(&pool, track.id).await.unwrap());
    assert_eq!(Track::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_track_with_unknown_priority_rejected() {
    let pool = setup().await;
    let refs = track_refs(&pool).await;

    let mut data = new_track(&refs, "Broken reference");
    data.priority_id = 999;
    let err = Track::create(&pool, data).await.unwrap_err();

    assert!(err.as_database_error().unwrap().is_foreign_key_violation());
}

#[tokio::test]
async fn test_referenced_priority_cannot_be_deleted() {
    let pool = setup().await;
    let refs = track_refs(&pool).await;
    Track::create(&pool, new_track(&refs, "Keeps priority alive")).await.unwrap();

    let err = Priority::delete(&pool, refs.priority.id).await.unwrap_err();
    assert!(err.as_database_error().unwrap().is_foreign_key_violation());
    assert!(Priority::find_by_id(&pool, refs.priority.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_track_handlers() {
    let pool = setup().await;
    let refs = track_refs(&pool).await;
    let track = Track::create(&pool, new_track(&refs, "Needs a handler")).await.unwrap();

    let handler = TrackHandler::create(&pool, CreateTrackHandler::now(refs.requester.id, track.id))
        .await
        .unwrap();
    assert_eq!(handler.tracker_id, Some(track.id));
    assert!(handler.handle_at.is_some());

    let handlers = TrackHandler::list_by_track(&pool, track.id).await.unwrap();
    assert_eq!(handlers.len(), 1);

    // The assignment pins the track
    assert!(Track::delete(&pool, track.id).await.is_err());

    assert!(TrackHandler::delete(&pool, handler.id).await.unwrap());
    assert!(Track::delete(&pool, track.id).await.unwrap());
}

#[tokio::test]
async fn test_products_by_company() {
    let pool = setup().await;
    let refs = track_refs(&pool).await;

    let products = Product::list_by_company(&pool, refs.product.company_id.unwrap())
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].to_string(), "TRK 1.0");
}

#[tokio::test]
async fn test_company_with_explicit_id() {
    let pool = setup().await;

    let company = Company::create(
        &pool,
        CreateCompany {
            id: Some(1),
            company_name: "ebizz".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(company.id, 1);
    assert_eq!(company.to_string(), "ebizz");

    let next = Company::create(
        &pool,
        CreateCompany {
            company_name: "Other".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(next.id, 2);
}

#[tokio::test]
async fn test_lookup_update_and_delete() {
    let pool = setup().await;

    let status = Status::create(&pool, CreateStatus { name: "Open".to_string() })
        .await
        .unwrap();
    let renamed = Status::update(&pool, status.id, CreateStatus { name: "Closed".to_string() })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.to_string(), "Closed");

    assert!(Status::update(&pool, 999, CreateStatus { name: "x".to_string() })
        .await
        .unwrap()
        .is_none());
    assert!(Status::delete(&pool, status.id).await.unwrap());
    assert!(Status::find_by_id(&pool, status.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_listing_users() {
    let pool = setup().await;
    for (first, email) in [
        ("Oliver", "oliver.patel@example.com"),
        ("Charlie", "charlie.johnson@example.com"),
        ("Emily", "emily.lewis@example.com"),
    ] {
        let mut data = new_user(email, "x");
        data.first_name = Some(first.to_string());
        User::create(&pool, data).await.unwrap();
    }

    let spec = ListSpec {
        table: "users",
        searchable: &["first_name", "email"],
        filterable: &["first_name", "email"],
        sortable: &["id", "first_name", "email"],
        default_sort: ("first_name", false),
    };

    let page = fetch_page::<User>(&pool, &spec, &ListQuery::default()).await.unwrap();
    let names: Vec<_> = page.items.iter().filter_map(|u| u.first_name.clone()).collect();
    assert_eq!(names, vec!["Charlie", "Emily", "Oliver"]);
    assert_eq!(page.total, 3);

    let query = ListQuery {
        search: Some("lewis".to_string()),
        ..Default::default()
    };
    let page = fetch_page::<User>(&pool, &spec, &query).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].email, "emily.lewis@example.com");
}
