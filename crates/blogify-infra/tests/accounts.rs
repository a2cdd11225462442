mod common;

use uuid::Uuid;

use blogify_core::DomainError;
use blogify_core::domain::Role;
use blogify_core::ports::PasswordService;
use blogify_core::services::{AccountService, StaticPrincipal};

use common::World;

#[tokio::test]
async fn login_matches_email_case_insensitively() {
    let world = World::new();
    let user = world
        .accounts
        .register("Foo", "Foo@Bar.com", "correct-horse")
        .await
        .unwrap();
    assert_eq!(user.email, "foo@bar.com");

    let principal = world
        .accounts
        .authenticate("foo@bar.com", "correct-horse")
        .await
        .unwrap();
    assert_eq!(principal.id, user.id);
    assert_eq!(principal.role, Role::User);

    let shouted = world
        .accounts
        .authenticate("FOO@BAR.COM", "correct-horse")
        .await
        .unwrap();
    assert_eq!(shouted.id, user.id);
}

#[tokio::test]
async fn duplicate_email_in_any_case_is_rejected() {
    let world = World::new();
    world
        .accounts
        .register("Foo", "foo@bar.com", "correct-horse")
        .await
        .unwrap();

    let result = world
        .accounts
        .register("Other Foo", "FOO@bar.com", "another-pass")
        .await;

    assert!(matches!(result, Err(DomainError::Duplicate(_))));
}

#[tokio::test]
async fn registration_validates_fields() {
    let world = World::new();

    let short_name = world.accounts.register(" A ", "a@b.com", "long-enough").await;
    let bad_email = world.accounts.register("Alice", "alice", "long-enough").await;
    let short_password = world.accounts.register("Alice", "a@b.com", "short").await;

    for result in [short_name, bad_email, short_password] {
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    }
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let world = World::new();
    world
        .accounts
        .register("Foo", "foo@bar.com", "correct-horse")
        .await
        .unwrap();

    let wrong = world.accounts.authenticate("foo@bar.com", "battery-staple").await;
    let unknown = world.accounts.authenticate("nobody@bar.com", "correct-horse").await;

    assert!(matches!(wrong, Err(DomainError::InvalidCredentials)));
    assert!(matches!(unknown, Err(DomainError::InvalidCredentials)));
}

#[tokio::test]
async fn static_principal_is_checked_before_the_store() {
    let world = World::new();
    let hash = world.passwords.hash("admin123").unwrap();
    let demo_id = Uuid::new_v4();
    let accounts = AccountService::new(world.store.clone(), world.passwords.clone())
        .with_static_principals(vec![StaticPrincipal::new(
            demo_id,
            "Demo Administrator".into(),
            "Admin@Blogify.com",
            hash,
            Role::Admin,
        )]);

    let principal = accounts
        .authenticate("admin@blogify.com", "admin123")
        .await
        .unwrap();
    assert_eq!(principal.id, demo_id);
    assert!(principal.actor().is_admin());

    let wrong = accounts.authenticate("admin@blogify.com", "admin124").await;
    assert!(matches!(wrong, Err(DomainError::InvalidCredentials)));

    // The static email is reserved.
    let clash = accounts
        .register("Impostor", "admin@blogify.com", "password123")
        .await;
    assert!(matches!(clash, Err(DomainError::Duplicate(_))));
}

#[tokio::test]
async fn only_admins_register_admins() {
    let world = World::new();
    let admin = world.user("Root", Role::Admin).await;
    let user = world.user("Alice", Role::User).await;

    let denied = world
        .accounts
        .register_admin(user, "Sneaky", "sneaky@example.com", "password123")
        .await;
    assert!(matches!(denied, Err(DomainError::Unauthorized)));

    let created = world
        .accounts
        .register_admin(admin, "Second Admin", "Second@Example.com", "password123")
        .await
        .unwrap();
    assert_eq!(created.role, Role::Admin);
    assert_eq!(created.email, "second@example.com");
}
