// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod default_inputs_csv_datasource;
        pub(crate) mod ledger_config_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod form_inputs_model;
        pub(crate) mod iso_date_model;
        pub(crate) mod ledger_config_model;
        pub(crate) mod monetary_input_model;
        pub(crate) mod month_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod ledger_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod cascade;
        pub(crate) mod default_inputs;
        pub(crate) mod ledger_api;
        pub(crate) mod ledger_config;
        pub(crate) mod ledger_key;
        pub(crate) mod month;
        pub(crate) mod monthly_record;
        pub(crate) mod payment_allocation;
    }
    pub(crate) mod logic {
        pub(crate) mod change_tracker;
        pub(crate) mod ledger_engine;
        pub(crate) mod payment_allocator;
        mod utils;
    }
    pub(crate) mod repositories {
        pub(crate) mod ledger_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod cascade_usecase;
    }
}

pub(crate) mod presentation {
    pub(crate) mod ledger_printer;
    pub(crate) mod utils;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::cascade::*;
        pub use crate::domain::entities::default_inputs::*;
        pub use crate::domain::entities::ledger_api::*;
        pub use crate::domain::entities::ledger_config::*;
        pub use crate::domain::entities::ledger_key::*;
        pub use crate::domain::entities::month::*;
        pub use crate::domain::entities::monthly_record::*;
        pub use crate::domain::entities::payment_allocation::*;
    }
}
