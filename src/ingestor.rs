use crate::config::FeedConfig;
use crate::parser::types::FeedRequest;
use crate::thread_manager::SteppableTask;

use std::io::{BufRead, Write};

/// Reads the feed line by line and forwards each non-empty line.
pub struct Ingestor {
    reader: Box<dyn BufRead + Send>,
    sender: crossbeam_channel::Sender<String>,
}

impl Ingestor {
    /// Connects to the live feed and asks for an initial snapshot.
    ///
    /// Returns the ingestor together with a writer for later requests on
    /// the same connection.
    pub fn connect(
        config: &FeedConfig,
        sender: crossbeam_channel::Sender<String>,
        request_receiver: crossbeam_channel::Receiver<FeedRequest>,
    ) -> Result<(Self, FeedWriter<std::net::TcpStream>), std::io::Error> {
        log::info!("Connecting to feed at {}:{}.", config.host, config.port);
        let stream = std::net::TcpStream::connect((config.host.as_str(), config.port))?;
        let mut writer = FeedWriter::new(stream.try_clone()?, request_receiver);
        writer.write_request(&FeedRequest::AircraftSnapshot)?;
        log::info!("Connection successful.");

        let reader = Box::new(std::io::BufReader::new(stream));
        Ok((Ingestor { reader, sender }, writer))
    }

    /// Replays a recorded feed from a file.
    pub fn replay(
        path: &std::path::Path,
        sender: crossbeam_channel::Sender<String>,
    ) -> Result<Self, std::io::Error> {
        log::info!("Replaying feed from '{}'.", path.display());
        let file = std::fs::File::open(path)?;
        Ok(Ingestor::from_reader(std::io::BufReader::new(file), sender))
    }

    pub fn from_reader<R: BufRead + Send + 'static>(
        reader: R,
        sender: crossbeam_channel::Sender<String>,
    ) -> Self {
        Ingestor {
            reader: Box::new(reader),
            sender,
        }
    }
}

impl SteppableTask for Ingestor {
    fn step(&mut self) -> bool {
        let mut line_buffer = String::new();

        let bytes_read = match self.reader.read_line(&mut line_buffer) {
            Ok(bytes_read) => bytes_read,
            Err(err) => {
                log::error!("Failed to read line from feed: {err}");
                return matches!(
                    err.kind(),
                    std::io::ErrorKind::Interrupted | std::io::ErrorKind::InvalidData
                );
            }
        };

        if bytes_read == 0 {
            log::info!("End of feed");
            return false;
        }
        let line = line_buffer.trim();
        if line.is_empty() || line.starts_with('#') {
            return true;
        }
        if let Err(err) = self.sender.send(line.to_string()) {
            log::error!("Ingestor: Failed to send to channel: {err}");
            return false;
        }
        true
    }
}

/// Writes requests such as detail lookups back to the feed.
pub struct FeedWriter<W> {
    writer: W,
    request_receiver: crossbeam_channel::Receiver<FeedRequest>,
}

impl<W: Write + Send + 'static> FeedWriter<W> {
    #[must_use]
    pub fn new(writer: W, request_receiver: crossbeam_channel::Receiver<FeedRequest>) -> Self {
        FeedWriter {
            writer,
            request_receiver,
        }
    }

    pub fn write_request(&mut self, request: &FeedRequest) -> Result<(), std::io::Error> {
        let mut line = serde_json::to_vec(request)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()
    }
}

impl<W: Write + Send + 'static> SteppableTask for FeedWriter<W> {
    fn step(&mut self) -> bool {
        let Ok(request) = self.request_receiver.recv() else {
            log::info!("FeedWriter: no more requests");
            return false;
        };
        if let Err(err) = self.write_request(&request) {
            log::error!("FeedWriter: Failed to send {request:?}: {err}");
            return false;
        }
        true
    }
}
