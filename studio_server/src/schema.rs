//! Diesel table definitions for the studio backend.
//!
//! Tables: profiles, packages, events, orders, pipeline_cards,
//! deliverables, download_logs, portfolio_items, showcase_items,
//! settings, legal_documents, faqs.

diesel::table! {
    profiles (id) {
        id -> Uuid,
        email -> Varchar,
        full_name -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        role -> Varchar,
        active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    packages (id) {
        id -> Int8,
        name -> Varchar,
        description -> Nullable<Text>,
        price_cents -> Int4,
        features -> Jsonb,
        display_order -> Int4,
        active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    events (id) {
        id -> Int8,
        name -> Varchar,
        organizer -> Nullable<Varchar>,
        venue -> Nullable<Varchar>,
        event_date -> Date,
        status -> Varchar,
        active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    orders (id) {
        id -> Int8,
        gateway_order_id -> Varchar,
        payment_key -> Varchar,
        amount_cents -> Int8,
        status -> Varchar,
        package_id -> Nullable<Int8>,
        event_id -> Nullable<Int8>,
        profile_id -> Nullable<Uuid>,
        athlete_name -> Nullable<Varchar>,
        athlete_number -> Nullable<Varchar>,
        contact_email -> Nullable<Varchar>,
        contact_phone -> Nullable<Varchar>,
        metadata -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    pipeline_cards (id) {
        id -> Int8,
        order_id -> Nullable<Int8>,
        event_id -> Nullable<Int8>,
        package_id -> Nullable<Int8>,
        athlete_name -> Varchar,
        athlete_number -> Nullable<Varchar>,
        status -> Varchar,
        position -> Int4,
        assignee_id -> Nullable<Uuid>,
        notes -> Nullable<Text>,
        due_date -> Nullable<Date>,
        delivered_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    deliverables (id) {
        id -> Int8,
        card_id -> Nullable<Int8>,
        order_id -> Nullable<Int8>,
        profile_id -> Nullable<Uuid>,
        title -> Varchar,
        external_url -> Text,
        expires_at -> Nullable<Timestamptz>,
        download_count -> Int4,
        active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    download_logs (id) {
        id -> Int8,
        deliverable_id -> Int8,
        ip_address -> Nullable<Varchar>,
        user_agent -> Nullable<Text>,
        downloaded_at -> Timestamptz,
    }
}

diesel::table! {
    portfolio_items (id) {
        id -> Int8,
        title -> Varchar,
        category -> Varchar,
        description -> Nullable<Text>,
        media_url -> Text,
        thumbnail_url -> Nullable<Text>,
        display_order -> Int4,
        published -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    showcase_items (id) {
        id -> Int8,
        title -> Varchar,
        category -> Varchar,
        description -> Nullable<Text>,
        media_url -> Text,
        thumbnail_url -> Nullable<Text>,
        display_order -> Int4,
        published -> Bool,
        featured -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    settings (id) {
        id -> Int8,
        key -> Varchar,
        value -> Jsonb,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    legal_documents (id) {
        id -> Int8,
        doc_type -> Varchar,
        title -> Varchar,
        body -> Text,
        version -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    faqs (id) {
        id -> Int8,
        question -> Text,
        answer -> Text,
        category -> Nullable<Varchar>,
        display_order -> Int4,
        published -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(pipeline_cards -> orders (order_id));
diesel::joinable!(deliverables -> pipeline_cards (card_id));
diesel::joinable!(download_logs -> deliverables (deliverable_id));

diesel::allow_tables_to_appear_in_same_query!(
    profiles,
    packages,
    events,
    orders,
    pipeline_cards,
    deliverables,
    download_logs,
    portfolio_items,
    showcase_items,
    settings,
    legal_documents,
    faqs,
);
