use avec_mem::ArrayError;
use avec_proc::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[display("IO error")]
    Io(#[from] #[source] std::io::Error),
    #[display("format storage error")]
    Capacity(#[from] #[source] ArrayError),
}
