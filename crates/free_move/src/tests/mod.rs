//! Multi-frame scenarios across characters, the index and the scene
