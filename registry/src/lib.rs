pub mod consts;
pub mod controller;
pub mod gateway;
pub mod model;
pub mod options;
pub mod store;
pub mod view;
