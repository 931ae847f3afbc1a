mod graph_file_reader;

pub use graph_file_reader::FileSystemGraphReader;
