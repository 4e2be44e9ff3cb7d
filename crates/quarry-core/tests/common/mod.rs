#![allow(dead_code)]

use quarry_core::db::Db;

quarry_core::entity! {
    /// Shared user fixture.
    pub struct User {
        primary_key: id,
        fields: {
            id: u64 => Uint,
            first_name: String => Text,
            last_name: String => Text,
        },
    }
}

pub fn fresh_db() -> Db {
    Db::in_memory()
}

/// Seed the two canonical rows: (1, Louis Bodart), (2, John Doe).
pub fn seed_two_users(db: &Db) {
    let users = db.repo::<User>();

    let mut louis = users.create();
    louis.id = 1;
    louis.first_name = "Louis".to_string();
    louis.last_name = "Bodart".to_string();
    users.save(&louis);

    let john = users.create_from(quarry_core::row! {
        "id" => 2u64,
        "first_name" => "John",
        "last_name" => "Doe",
    });
    users.save(&john);
}

/// Seed the third canonical row: (3, John Gallagher).
pub fn seed_third_user(db: &Db) {
    let users = db.repo::<User>();
    let gallagher = users.create_from(quarry_core::row! {
        "id" => 3u64,
        "first_name" => "John",
        "last_name" => "Gallagher",
    });
    users.save(&gallagher);
}

pub fn last_names(rows: &[User]) -> Vec<&str> {
    rows.iter().map(|user| user.last_name.as_str()).collect()
}
