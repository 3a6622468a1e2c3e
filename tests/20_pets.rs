mod common;

use anyhow::Result;
use reqwest::StatusCode;

use petbook::config::{AppConfig, ListingAccess};
use petbook::database::models::Role;

async fn seed(app: &common::TestApp, cookie: &str) -> Result<()> {
    for (name, species, city, country) in [
        ("Milo", "cat", "Lima", "PE"),
        ("Rex", "dog", "Lima", "PE"),
        ("Luna", "cat", "Quito", "EC"),
    ] {
        let res = app
            .add_pet(
                cookie,
                &[
                    ("name", name),
                    ("species", species),
                    ("age", "3"),
                    ("city", city),
                    ("country", country),
                ],
            )
            .await?;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }
    Ok(())
}

async fn list(app: &common::TestApp, cookie: &str, query: &str) -> Result<Vec<String>> {
    let res = app.get(&format!("/pets{}", query), Some(cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let data = common::page_data(res).await?;
    assert_eq!(data["view"], "pets");
    Ok(common::pet_names(&data))
}

#[tokio::test]
async fn unfiltered_listing_returns_every_pet_in_insertion_order() -> Result<()> {
    let app = common::spawn_app().await?;
    let cookie = app.register("alice").await?;
    seed(&app, &cookie).await?;

    assert_eq!(list(&app, &cookie, "").await?, vec!["Milo", "Rex", "Luna"]);
    Ok(())
}

#[tokio::test]
async fn blank_values_do_not_constrain() -> Result<()> {
    let app = common::spawn_app().await?;
    let cookie = app.register("alice").await?;
    seed(&app, &cookie).await?;

    assert_eq!(list(&app, &cookie, "?species=dog&name=").await?, vec!["Rex"]);
    assert_eq!(list(&app, &cookie, "?city=&species=cat").await?, vec!["Milo", "Luna"]);
    Ok(())
}

#[tokio::test]
async fn address_filters_match_every_supplied_key() -> Result<()> {
    let app = common::spawn_app().await?;
    let cookie = app.register("alice").await?;
    seed(&app, &cookie).await?;

    assert_eq!(list(&app, &cookie, "?city=Lima").await?, vec!["Milo", "Rex"]);
    assert_eq!(list(&app, &cookie, "?city=Lima&country=PE&species=dog").await?, vec!["Rex"]);
    assert!(list(&app, &cookie, "?city=Lima&country=EC").await?.is_empty());
    assert!(list(&app, &cookie, "?city=lima").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn direct_filters_compare_text_forms() -> Result<()> {
    let app = common::spawn_app().await?;
    let cookie = app.register("alice").await?;
    seed(&app, &cookie).await?;

    assert_eq!(list(&app, &cookie, "?age=3&species=cat").await?, vec!["Milo", "Luna"]);
    assert!(list(&app, &cookie, "?age=4").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_fields_yield_an_empty_list() -> Result<()> {
    let app = common::spawn_app().await?;
    let cookie = app.register("alice").await?;
    seed(&app, &cookie).await?;

    assert!(list(&app, &cookie, "?color=black").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn pet_detail_is_visible_to_any_user_with_mod_hint() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.register("alice").await?;
    let bob = app.register("bob").await?;
    seed(&app, &alice).await?;
    let milo = app.pet_ids(&alice).await?.remove(0);

    let res = app.get(&format!("/pets/{}", milo), Some(&bob)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let data = common::page_data(res).await?;
    assert_eq!(data["view"], "pets/pet-details");
    assert_eq!(data["pet"]["name"], "Milo");
    assert_eq!(data["pet"]["address"]["city"], "Lima");
    assert_eq!(data["isMod"], false);

    let bob_user = app.state.users.find_by_username("bob").await?.expect("bob");
    app.state.users.set_role(bob_user.id, Role::Moderator).await?;
    let data = common::page_data(app.get(&format!("/pets/{}", milo), Some(&bob)).await?).await?;
    assert_eq!(data["isMod"], true);
    Ok(())
}

#[tokio::test]
async fn missing_or_malformed_pet_ids_are_not_found() -> Result<()> {
    let app = common::spawn_app().await?;
    let cookie = app.register("alice").await?;

    let res = app.get("/pets/not-a-uuid", Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.get(&format!("/pets/{}", uuid::Uuid::new_v4()), Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn moderator_only_listing_forbids_plain_users() -> Result<()> {
    let mut config = AppConfig::for_tests();
    config.pets.listing_access = ListingAccess::Moderator;
    let app = common::spawn_app_with(config).await?;

    let alice = app.register("alice").await?;
    let res = app.get("/pets", Some(&alice)).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let user = app.state.users.find_by_username("alice").await?.expect("alice");
    app.state.users.set_role(user.id, Role::Admin).await?;
    let res = app.get("/pets", Some(&alice)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
