pub mod check_state;
pub mod column;
pub mod controller;
pub mod data_source;
pub mod events;
pub mod group;
pub mod group_record;
pub mod grouping;
pub mod image;
pub mod row;
