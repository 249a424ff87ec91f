// Business domains
pub mod registration;
pub mod social_graph;
