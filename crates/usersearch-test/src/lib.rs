//! User search service - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use a
//! single `usersearch_test::` path.

#![allow(ambiguous_glob_reexports)]

pub mod component {
    pub use usersearch_core::*;
    pub use usersearch_service::*;

    pub mod db {
        pub use usersearch_db::db::*;
        pub use usersearch_db::error;
    }

    pub mod index {
        pub use usersearch_index::error;
        pub use usersearch_index::index::*;
    }

    pub mod config {
        pub use usersearch_app::config::ConfigHandler;
        pub use usersearch_core::config::*;
    }
}

pub mod app {
    pub use usersearch_app::*;

    pub mod api {
        pub use usersearch_app::app::api::*;
    }
}
