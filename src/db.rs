use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Create users table (sellers reference it)
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Insert default user if not exists (single-user mode: seller defaults to user 1)
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        INSERT OR IGNORE INTO users (id, name, created_at, updated_at)
        VALUES (1, 'admin', datetime('now'), datetime('now'))
        "#
        .to_owned(),
    ))
    .await?;

    // Create partners table (offer bidders and property buyers)
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS partners (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create property_types table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS property_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            sequence INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create property_tags table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS property_tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            color INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create properties table
    // available, total_area and best_price are derived columns maintained by the
    // service layer inside the transaction that changes their inputs.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS properties (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            postcode TEXT,
            date_availability TEXT,
            expected_price REAL NOT NULL CHECK (expected_price > 0),
            selling_price REAL CHECK (selling_price IS NULL OR selling_price > 0),
            bedrooms INTEGER NOT NULL DEFAULT 2,
            living_area INTEGER NOT NULL DEFAULT 0,
            facades INTEGER NOT NULL DEFAULT 0,
            garage INTEGER NOT NULL DEFAULT 0,
            garden INTEGER NOT NULL DEFAULT 0,
            garden_area INTEGER,
            garden_orientation TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            state TEXT NOT NULL DEFAULT 'new',
            available INTEGER NOT NULL DEFAULT 0,
            total_area INTEGER NOT NULL DEFAULT 0,
            best_price REAL NOT NULL DEFAULT 0,
            property_type_id INTEGER,
            seller_id INTEGER NOT NULL DEFAULT 1,
            buyer_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (property_type_id) REFERENCES property_types(id) ON DELETE SET NULL,
            FOREIGN KEY (seller_id) REFERENCES users(id),
            FOREIGN KEY (buyer_id) REFERENCES partners(id) ON DELETE SET NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create property_tag_links junction table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS property_tag_links (
            property_id INTEGER NOT NULL,
            tag_id INTEGER NOT NULL,
            PRIMARY KEY (property_id, tag_id),
            FOREIGN KEY (property_id) REFERENCES properties(id) ON DELETE CASCADE,
            FOREIGN KEY (tag_id) REFERENCES property_tags(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create offers table
    // property_type_id is copied from the parent property at creation so offers
    // can be filtered by type without a join.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS offers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            price REAL NOT NULL CHECK (price > 0),
            status TEXT,
            partner_id INTEGER NOT NULL,
            property_id INTEGER NOT NULL,
            validity INTEGER NOT NULL DEFAULT 7,
            date_deadline TEXT NOT NULL,
            property_type_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (partner_id) REFERENCES partners(id),
            FOREIGN KEY (property_id) REFERENCES properties(id) ON DELETE CASCADE,
            FOREIGN KEY (property_type_id) REFERENCES property_types(id) ON DELETE SET NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create indexes
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_offers_property_id ON offers(property_id)".to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_offers_property_type_id ON offers(property_type_id)"
            .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_properties_state ON properties(state)".to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_properties_seller_id ON properties(seller_id)".to_owned(),
    ))
    .await?;

    Ok(())
}
