pub mod graph_scene;
