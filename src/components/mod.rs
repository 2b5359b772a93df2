pub mod traffic_graph;
