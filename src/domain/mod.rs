pub mod body;
pub mod incident;
pub mod labels;
pub mod ticket;
