//! Common test utilities and a shared two-ship fleet

#![allow(dead_code)]

use chrono::Utc;
use fleet_service::config::Config;
use fleet_service::domain::repository::{Collection, DocumentStore};
use fleet_service::domain::FleetServices;
use fleet_service::infra::identity::StaticTokenIdentityProvider;
use fleet_service::infra::storage::InMemoryDocumentStore;
use fleet_service::contract::{
    Caller, FormCategory, FormTemplate, NewFormTemplate, NewShip, Role, Ship, User,
};
use fleet_service::FleetModule;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

/// Realistic fleet for testing
/// MV Aurora (s1): staff + 3 crew
/// MV Borealis (s2): staff + 1 crew
/// plus a master and one staff member with no ship
pub struct TestFleet {
    pub store: Arc<InMemoryDocumentStore>,
    pub services: FleetServices,
    pub aurora: Ship,
    pub borealis: Ship,
    pub master: Caller,
    pub aurora_staff: Caller,
    pub aurora_crew: Vec<Caller>,
    pub borealis_staff: Caller,
    pub borealis_crew: Caller,
    pub shoreside_staff: Caller,
    pub shoreside_crew: Caller,
}

impl TestFleet {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        let dyn_store: Arc<dyn DocumentStore> = store.clone();
        let services = FleetServices::new(dyn_store.clone(), Default::default());
        let users = Collection::<User>::new(dyn_store);

        let master = caller_of(&insert_user(&users, "Master Mariner", Role::Master, None).await);

        let aurora = services
            .ships
            .create(&master, new_ship("MV Aurora", "9000001"))
            .await
            .unwrap();
        let borealis = services
            .ships
            .create(&master, new_ship("MV Borealis", "9000002"))
            .await
            .unwrap();

        let aurora_staff =
            caller_of(&insert_user(&users, "Aurora Chief", Role::Staff, Some(&aurora.id)).await);
        let mut aurora_crew = Vec::new();
        for name in ["Aurora Deckhand", "Aurora Oiler", "Aurora Cook"] {
            aurora_crew.push(caller_of(
                &insert_user(&users, name, Role::Crew, Some(&aurora.id)).await,
            ));
        }
        let borealis_staff = caller_of(
            &insert_user(&users, "Borealis Chief", Role::Staff, Some(&borealis.id)).await,
        );
        let borealis_crew = caller_of(
            &insert_user(&users, "Borealis Deckhand", Role::Crew, Some(&borealis.id)).await,
        );
        let shoreside_staff =
            caller_of(&insert_user(&users, "Shoreside Clerk", Role::Staff, None).await);
        let shoreside_crew =
            caller_of(&insert_user(&users, "Shoreside Trainee", Role::Crew, None).await);

        Self {
            store,
            services,
            aurora,
            borealis,
            master,
            aurora_staff,
            aurora_crew,
            borealis_staff,
            borealis_crew,
            shoreside_staff,
            shoreside_crew,
        }
    }

    pub async fn template(&self, name: &str, category: FormCategory) -> FormTemplate {
        let new_template: NewFormTemplate = serde_json::from_value(json!({
            "name": name,
            "category": category,
            "fields": [
                {"id": "checked", "label": "Checked", "type": "boolean", "required": true},
                {"id": "remarks", "label": "Remarks", "type": "text"}
            ]
        }))
        .unwrap();
        self.services
            .documents
            .create_template(&self.master, new_template)
            .await
            .unwrap()
    }
}

pub fn new_ship(name: &str, imo: &str) -> NewShip {
    serde_json::from_value(json!({
        "name": name,
        "type": "bulk_carrier",
        "imo_number": imo,
        "flag_state": "Panama"
    }))
    .unwrap()
}

/// Insert a user directly, bypassing role checks; `firebase_uid` is `uid-<slug>`
pub async fn insert_user(
    users: &Collection<User>,
    name: &str,
    role: Role,
    ship_id: Option<&str>,
) -> User {
    let slug = name.to_lowercase().replace(' ', "-");
    let now = Utc::now();
    users
        .insert(&User {
            id: String::new(),
            email: format!("{slug}@fleet.io"),
            name: name.to_owned(),
            role,
            ship_id: ship_id.map(str::to_owned),
            phone: None,
            position: None,
            active: true,
            firebase_uid: Some(format!("uid-{slug}")),
            ship_name: None,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap()
}

pub fn caller_of(user: &User) -> Caller {
    Caller::from(user)
}

/// A module over an in-memory store whose static tokens are `token-<role>`
pub async fn test_module() -> (FleetModule, Arc<dyn DocumentStore>) {
    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    let users = Collection::<User>::new(store.clone());
    insert_user(&users, "Master Mariner", Role::Master, None).await;
    insert_user(&users, "Deck Cadet", Role::Crew, None).await;
    let inactive = insert_user(&users, "Retired Bosun", Role::Crew, None).await;
    users.patch(&inactive.id, &json!({"active": false})).await.unwrap();

    let identity = Arc::new(StaticTokenIdentityProvider::new(HashMap::from([
        ("token-master".to_owned(), "uid-master-mariner".to_owned()),
        ("token-crew".to_owned(), "uid-deck-cadet".to_owned()),
        ("token-inactive".to_owned(), "uid-retired-bosun".to_owned()),
        ("token-stranger".to_owned(), "uid-nobody".to_owned()),
    ])));
    let module = FleetModule::from_parts(store.clone(), identity, &Config::default());
    (module, store)
}
